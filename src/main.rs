use std::sync::Arc;

use eyre::{Context, Result};
use taskwise::app::services::ActionService;
use taskwise::cli::{Command, TaskCommand};
use taskwise::config::{Configuration, init_logger, verbose};
use taskwise::models::{Action, ArcEventTx, Event, Item, ItemState};
use taskwise::notify::NotificationManager;
use taskwise::store::new_store;
use taskwise::sync::ItemSyncController;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    let config = cmd.get_config()?;
    Configuration::init(config.clone())?;
    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");

    verbose!("[+] Initializing storage...");
    let store = new_store(&config.storage)
        .await
        .wrap_err("initializing storage")?;
    verbose!("[+] Storage initialized");

    let notifier = NotificationManager::new();
    let controller = ItemSyncController::new(store, notifier.clone());

    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let (tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_tx: ArcEventTx = Arc::new(tx);

    let token = CancellationToken::new();
    let mut service = ActionService::new(controller, action_rx, event_tx, token.clone());
    let service = tokio::spawn(async move { service.start().await });

    let task = cmd.task().cloned().unwrap_or(TaskCommand::List { state: None });
    let expected = dispatch_task(&action_tx, task)?;

    let mut received = 0;
    while received < expected {
        let Some(event) = event_rx.recv().await else {
            break;
        };
        print_event(event);
        received += 1;
    }

    for notice in notifier.active().await {
        println!("[{}] {}", notice.message().kind(), notice.message().message());
    }

    token.cancel();
    service.await?.wrap_err("draining action service")?;
    Ok(())
}

/// Translates the subcommand into actions and returns how many events
/// to wait for.
fn dispatch_task(
    action_tx: &mpsc::UnboundedSender<Action>,
    task: TaskCommand,
) -> Result<usize> {
    match task {
        TaskCommand::List { state: Some(state) } => {
            action_tx.send(Action::LoadItems(state.into()))?;
            Ok(1)
        }
        TaskCommand::List { state: None } => {
            for state in ItemState::ALL {
                action_tx.send(Action::LoadItems(state))?;
            }
            Ok(ItemState::ALL.len())
        }
        TaskCommand::Add { title, state } => {
            action_tx.send(Action::AddItem {
                title,
                state: state.map(Into::into).unwrap_or_default(),
            })?;
            Ok(1)
        }
        TaskCommand::Remove { title } => {
            action_tx.send(Action::RemoveItem(title))?;
            Ok(1)
        }
        TaskCommand::Clear => {
            action_tx.send(Action::ClearItems)?;
            Ok(1)
        }
        TaskCommand::Destroy => {
            action_tx.send(Action::RemoveStore)?;
            Ok(1)
        }
    }
}

fn print_event(event: Event) {
    match event {
        Event::ItemsFetched { state, items } => print_items(state, &items),
        Event::ItemAdded(title) => println!("Added \"{}\"", title),
        Event::ItemRemoved(title) => println!("Removed \"{}\"", title),
        Event::ItemsCleared => println!("All items cleared"),
        Event::StoreRemoved => println!("Store removed"),
        Event::ActionFailed(message) => eprintln!("Error: {}", message),
    }
}

fn print_items(state: ItemState, items: &[Item]) {
    println!("{} ({})", state.label(), items.len());
    for item in items {
        println!("  - {}", item.title);
    }
}
