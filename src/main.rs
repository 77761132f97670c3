use linguarium::domain_model::PageSize;
use linguarium::logger::*;
use linguarium::server::*;
use linguarium::settings::*;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(server: &Server, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Migrate => {}
        Command::Friendship { action, me, other } => {
            let friendship = server.friendship_service.manage(me, other, action).await?;
            print_json(&friendship)?;
        }
        Command::Friends {
            user,
            page_size,
            after,
        } => {
            let friends = server
                .friendship_service
                .list_friends(user, PageSize(page_size), after)
                .await?;
            let next = friends.last().map(|f| f.cursor().to_string());
            print_json(&serde_json::json!({ "friends": friends, "next": next }))?;
        }
        Command::Cards { owner, search } => {
            let cards = match search {
                Some(fragment) => server.card_service.search_cards(owner, &fragment).await?,
                None => server.card_service.list_cards(owner).await?,
            };
            print_json(&cards)?;
        }
        Command::Tags { owner } => {
            let tags = server.card_service.list_tags(owner).await?;
            print_json(&tags)?;
        }
        Command::RenameTag { owner, from, to } => {
            let relinked = server.card_service.rename_tag(owner, &from, &to).await?;
            print_json(&serde_json::json!({ "relinked": relinked }))?;
        }
        Command::Suggestions { recipient } => {
            let suggestions = server.suggestion_service.list_suggestions(recipient).await?;
            print_json(&suggestions)?;
        }
        Command::Accept {
            suggestion,
            recipient,
        } => {
            let card_id = server
                .suggestion_service
                .accept_suggestion(suggestion, recipient)
                .await?;
            print_json(&serde_json::json!({ "card_id": card_id }))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let server = Server::try_new(&project_settings).await?;
    let result = run(&server, cli.command).await;
    server.shutdown().await;

    if let Err(e) = &result {
        error!("command failed: {e}");
    }
    result
}
