use anyhow::Result;
use luncheon_comments::{
    ApiClient, AuthContext, CommentBackend, CommentStore, CommentsView, Config, NewComment, Submitted,
};
use luncheon_shared::{CommentBody, ReactionKind, Scope};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

enum Command {
    List,
    Post(String),
    Reply { parent_id: String, content: String },
    React { comment_id: String, kind: ReactionKind },
    Delete(String),
}

fn print_usage() {
    println!("Usage: luncheon-comments [--show <SHOW_ID>] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  list                      Show the thread");
    println!("  post <TEXT>               Add a top-level comment");
    println!("  reply <PARENT_ID> <TEXT>  Reply to a comment");
    println!("  like <ID>                 Toggle a like");
    println!("  dislike <ID>              Toggle a dislike");
    println!("  delete <ID>               Delete a comment or reply");
    println!();
    println!("Options:");
    println!("  --show <SHOW_ID>          Use a show's thread instead of the home page");
    println!("  --help, -h                Show this help message");
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn parse_args(args: &[String]) -> Option<(Scope, Command)> {
    let mut show_id = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--show" => {
                let Some(id) = args.get(i + 1) else {
                    fail("--show requires a show id");
                };
                show_id = Some(id.clone());
                i += 2;
            }
            "--help" | "-h" => return None,
            other => {
                rest.push(other.to_string());
                i += 1;
            }
        }
    }

    let command = match rest.as_slice() {
        [] => Command::List,
        [cmd] if cmd == "list" => Command::List,
        [cmd, text @ ..] if cmd == "post" && !text.is_empty() => Command::Post(text.join(" ")),
        [cmd, parent, text @ ..] if cmd == "reply" && !text.is_empty() => Command::Reply {
            parent_id: parent.clone(),
            content: text.join(" "),
        },
        [cmd, id] if cmd == "like" || cmd == "dislike" => Command::React {
            comment_id: id.clone(),
            kind: cmd.parse().unwrap_or_else(|e: luncheon_shared::ParseReactionKindError| fail(&e.to_string())),
        },
        [cmd, id] if cmd == "delete" => Command::Delete(id.clone()),
        _ => fail(&format!("Unknown command: {}", rest.join(" "))),
    };

    Some((Scope::from(show_id), command))
}

fn print_body(body: &CommentBody, auth: &AuthContext, indent: &str) {
    let you = if auth.owns(body) { " (you)" } else { "" };
    let staff = if body.author.role.can_moderate() { " *" } else { "" };
    let mark = match body.reactions.user_reaction {
        Some(kind) => format!(" [{}d]", kind),
        None => String::new(),
    };
    println!(
        "{}[{}] {}{}{} {:?} +{} -{}{}",
        indent,
        body.id,
        body.author.name,
        staff,
        you,
        body.status,
        body.reactions.likes,
        body.reactions.dislikes,
        mark,
    );
    println!("{}    {}", indent, body.content);
}

fn print_thread(view: &CommentsView<'_>, auth: &AuthContext) {
    println!(
        "{} comments from {} participants",
        view.total_comments, view.total_participants
    );
    for comment in view.comments {
        print_body(&comment.body, auth, "");
        for reply in &comment.replies {
            print_body(&reply.body, auth, "    ");
        }
    }
    if let Some(error) = view.error {
        eprintln!("Error: {}", error);
    }
}

async fn run<B: CommentBackend>(store: &mut CommentStore<B>, scope: Scope, command: Command) -> Result<()> {
    store.load_comments(scope).await?;

    match command {
        Command::List => {}
        Command::Post(content) => {
            if let Submitted::Comment { id } = store.submit_comment(NewComment::top_level(content)).await? {
                println!("Posted {} (awaiting moderation)", id);
            }
        }
        Command::Reply { parent_id, content } => {
            match store.submit_comment(NewComment::reply(parent_id, content)).await? {
                Submitted::Reply { id, parent_id } => {
                    println!("Replied to {} with {} (awaiting moderation)", parent_id, id);
                }
                Submitted::Orphaned { id, parent_id } => {
                    println!("Saved {} but {} is not in this thread", id, parent_id);
                }
                _ => {}
            }
        }
        Command::React { comment_id, kind } => {
            if store.update_reaction(&comment_id, kind).await.is_none() {
                anyhow::bail!("No comment {} in this thread", comment_id);
            }
        }
        Command::Delete(comment_id) => {
            if !store.delete_comment(&comment_id).await? {
                println!("{} was not in the local thread", comment_id);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "luncheon_comments=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((scope, command)) = parse_args(&args) else {
        print_usage();
        return Ok(());
    };

    let config = Config::from_env()?;
    let auth = config
        .api_token
        .as_deref()
        .map(AuthContext::from_bearer_token)
        .unwrap_or_default();
    let api = ApiClient::new(&config.api_url).with_token(config.api_token.clone());
    let mut store = CommentStore::new(api, auth, config.store);

    let result = run(&mut store, scope, command).await;
    print_thread(&store.view(), store.auth());

    if let Err(err) = result {
        fail(&err.to_string());
    }

    Ok(())
}
