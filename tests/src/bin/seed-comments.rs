use anyhow::Context;
use kanban_client::{
    api::{validate_content, AuthToken, BoardId, CommentGateway, NewComment},
    HttpGateway,
};
use rand::Rng;

const MIN_WORDS: usize = 3;
const MAX_WORDS: usize = 60;

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    /// Board to fill
    #[structopt(short, long)]
    board: i64,

    /// Number of comments to post
    #[structopt(short, long, default_value = "50")]
    count: usize,
}

fn gen_comment_text(rng: &mut impl Rng) -> String {
    loop {
        let text = lipsum::lipsum_words(rng.gen_range(MIN_WORDS..=MAX_WORDS));
        if validate_content(&text).is_ok() {
            return text;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let tok = std::env::var("KANBAN_TOKEN").context("retrieving KANBAN_TOKEN environment variable")?;
    let gateway = HttpGateway::new(opt.host, Some(AuthToken(tok)));
    let board = BoardId(opt.board);

    let mut rng = rand::thread_rng();
    for i in 0..opt.count {
        let comment = NewComment::new(gen_comment_text(&mut rng));
        gateway
            .create(board, &comment)
            .await
            .with_context(|| format!("posting comment {i} on board {board}"))?;
        tracing::debug!(i, "posted comment");
    }

    let total = gateway
        .list(board)
        .await
        .context("listing comments after seeding")?
        .len();
    tracing::info!(posted = opt.count, total, "seeded board {board}");
    Ok(())
}
