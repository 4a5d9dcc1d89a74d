use std::io::Write;

use anyhow::Context;
use chrono::Utc;
use kanban_client::{
    api::{AuthToken, BoardId, CommentGateway, CommentId, Identity, Session},
    CommentList, HttpGateway, Locale, RowMode, TimeFormatter,
};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    /// Language of the output, "en" or "ko"
    #[structopt(short, long, default_value = "en")]
    locale: Locale,

    /// Print raw comments as JSON
    #[structopt(long)]
    json: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// List the comments of a board
    List { board: i64 },

    /// Post a comment
    Create { board: i64, content: String },

    /// Replace the content of one of your comments
    Edit {
        board: i64,
        id: i64,
        content: String,
    },

    /// Delete one of your comments
    Delete {
        board: i64,
        id: i64,

        /// Do not ask for confirmation
        #[structopt(short, long)]
        yes: bool,
    },

    /// List your comments across all boards
    Mine,
}

fn session() -> anyhow::Result<Session> {
    let tok = match std::env::var("KANBAN_TOKEN") {
        Ok(tok) => AuthToken(tok),
        Err(std::env::VarError::NotPresent) => return Ok(Session::anonymous()),
        Err(e) => return Err(e).context("retrieving KANBAN_TOKEN environment variable"),
    };
    let identity = std::env::var("KANBAN_USER").ok().map(Identity::new);
    Ok(Session {
        token: Some(tok),
        identity,
    })
}

fn ask(question: &str) -> bool {
    print!("{question} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(e) => {
            tracing::error!(?e, "failed reading confirmation");
            false
        }
    }
}

fn fail_on_alerts(list: &mut CommentList) -> anyhow::Result<()> {
    match list.take_alerts().into_iter().next() {
        Some(alert) => Err(anyhow::anyhow!(alert)),
        None => Ok(()),
    }
}

fn print_list(opt: &Opt, session: &Session, list: &CommentList) -> anyhow::Result<()> {
    if opt.json {
        let out = serde_json::to_string_pretty(list.comments())
            .context("serializing comments")?;
        println!("{out}");
        return Ok(());
    }
    if list.is_empty() {
        println!("{}", opt.locale.no_comments());
        return Ok(());
    }
    let fmt = TimeFormatter::utc(opt.locale);
    for row in list.rows(session, &fmt, Utc::now()) {
        let c = row.comment;
        if let RowMode::View {
            label,
            edited,
            can_mutate,
        } = row.mode
        {
            print!("#{} {}, {}", c.id, c.author_username, label);
            if edited {
                print!(" {}", opt.locale.edited_marker());
            }
            if can_mutate {
                print!(" *");
            }
            println!();
        }
        for line in c.content.lines() {
            println!("    {line}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let session = session()?;
    let gateway = HttpGateway::new(opt.host.clone(), session.token.clone());

    let board = match &opt.cmd {
        Command::List { board }
        | Command::Create { board, .. }
        | Command::Edit { board, .. }
        | Command::Delete { board, .. } => BoardId(*board),
        Command::Mine => {
            let comments = gateway
                .list_mine()
                .await
                .context("listing your comments")?;
            if opt.json {
                println!("{}", serde_json::to_string_pretty(&comments)?);
                return Ok(());
            }
            let fmt = TimeFormatter::utc(opt.locale);
            for c in comments {
                let board = c.board_title.as_deref().unwrap_or("?");
                println!("#{} [{}] {}", c.id, board, fmt.format_now(c.created_at));
                for line in c.content.lines() {
                    println!("    {line}");
                }
            }
            return Ok(());
        }
    };

    let (mut list, req) = CommentList::mount(board, opt.locale);
    list.run(&gateway, Some(req)).await;

    match &opt.cmd {
        Command::List { .. } | Command::Mine => (),
        Command::Create { content, .. } => {
            list.set_compose_draft(content.clone());
            let req = list
                .submit_create()
                .with_context(|| list.create_error().unwrap_or("nothing to post").to_string())?;
            list.run(&gateway, Some(req)).await;
            if let Some(err) = list.create_error() {
                anyhow::bail!("{err}");
            }
        }
        Command::Edit { id, content, .. } => {
            let id = CommentId(*id);
            list.begin_edit(id);
            anyhow::ensure!(
                list.editing_id() == Some(id),
                "comment {id} is not on board {board}"
            );
            list.set_edit_draft(content.clone());
            let req = list.submit_edit(id);
            fail_on_alerts(&mut list)?;
            let req = req.context("nothing to save")?;
            list.run(&gateway, Some(req)).await;
            fail_on_alerts(&mut list)?;
        }
        Command::Delete { id, yes, .. } => {
            let req = list.request_delete(CommentId(*id), |q| *yes || ask(q));
            let Some(req) = req else {
                return Ok(());
            };
            list.run(&gateway, Some(req)).await;
            fail_on_alerts(&mut list)?;
        }
    }

    print_list(&opt, &session, &list)
}
