use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::gateway::ProfileGateway;
use crate::resolve::Resolver;
use crate::state::{Delta, ProviderCommand};

/// Runs lookups on a worker thread. The resolver (and its cache) never
/// leaves that thread; commands are handled strictly in arrival order.
pub fn spawn_provider<G>(
    gateway: G,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    G: ProfileGateway + Send + 'static,
{
    thread::spawn(move || {
        let mut resolver = Resolver::new(gateway);
        while let Ok(cmd) = cmd_rx.recv() {
            let delta = handle_command(&mut resolver, cmd);
            if tx.send(delta).is_err() {
                return;
            }
        }
    })
}

pub fn handle_command<G: ProfileGateway>(
    resolver: &mut Resolver<G>,
    cmd: ProviderCommand,
) -> Delta {
    match cmd {
        ProviderCommand::Resolve {
            generation,
            username,
        } => match resolver.resolve(&username) {
            Ok(Some(view)) => Delta::Resolved {
                generation,
                view: Box::new(view),
            },
            Ok(None) => Delta::Skipped { generation },
            Err(err) => Delta::LookupFailed {
                generation,
                message: err.to_string(),
                detail: err.detail(),
            },
        },
    }
}
