//! Background save writer.
//!
//! The simulation thread exports a [`SavedCreature`] snapshot and hands it to
//! the worker; serialization, compression and disk I/O happen on the worker
//! thread. The snapshot is a deep copy, so the creature keeps ticking while
//! the save is written.

use crate::error::{IoError, Result};
use crate::persistence::{SaveManager, AUTOSAVE_SLOT};
use squidmind_data::SavedCreature;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

/// Commands for the autosave thread.
pub enum AutosaveCommand {
    /// Writes a snapshot to a slot.
    Save {
        slot: String,
        saved: Box<SavedCreature>,
    },
    /// Replies with the number of saves written so far, once every earlier
    /// command has been handled.
    Flush(Sender<usize>),
    /// Shutdown the autosave thread.
    Stop,
}

/// Handle to the autosave thread.
pub struct AutosaveWorker {
    sender: Sender<AutosaveCommand>,
    handle: Option<JoinHandle<usize>>,
}

impl AutosaveWorker {
    /// Spawns the writer thread.
    pub fn new(manager: SaveManager) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("squidmind-autosave".into())
            .spawn(move || {
                let mut written = 0usize;
                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AutosaveCommand::Save { slot, saved } => {
                            match manager.save(&slot, &saved) {
                                Ok(_) => written += 1,
                                Err(e) => tracing::warn!(slot, error = %e, "Autosave failed"),
                            }
                        }
                        AutosaveCommand::Flush(reply) => {
                            let _ = reply.send(written);
                        }
                        AutosaveCommand::Stop => break,
                    }
                }
                tracing::debug!(written, "Autosave thread stopped");
                written
            })?;

        Ok(Self {
            sender: tx,
            handle: Some(handle),
        })
    }

    /// Returns a new sender handle to communicate with the autosave thread.
    #[must_use]
    pub fn clone_sender(&self) -> Sender<AutosaveCommand> {
        self.sender.clone()
    }

    /// Queues a snapshot for the autosave slot.
    pub fn submit(&self, saved: SavedCreature) -> Result<()> {
        self.submit_to(AUTOSAVE_SLOT, saved)
    }

    pub fn submit_to(&self, slot: &str, saved: SavedCreature) -> Result<()> {
        self.sender
            .send(AutosaveCommand::Save {
                slot: slot.to_string(),
                saved: Box::new(saved),
            })
            .map_err(|_| IoError::channel("autosave thread is not running"))
    }

    /// Blocks until every queued save has been handled.
    pub fn flush(&self) -> Result<usize> {
        let (tx, rx) = mpsc::channel();
        self.sender
            .send(AutosaveCommand::Flush(tx))
            .map_err(|_| IoError::channel("autosave thread is not running"))?;
        rx.recv()
            .map_err(|_| IoError::channel("autosave thread exited before replying"))
    }

    /// Drains pending saves, stops the thread and returns how many saves it
    /// wrote.
    pub fn shutdown(mut self) -> Result<usize> {
        self.stop()
    }

    fn stop(&mut self) -> Result<usize> {
        let Some(handle) = self.handle.take() else {
            return Ok(0);
        };
        let _ = self.sender.send(AutosaveCommand::Stop);
        handle
            .join()
            .map_err(|_| IoError::channel("autosave thread panicked"))
    }
}

impl Drop for AutosaveWorker {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::warn!(error = %e, "Autosave worker did not stop cleanly");
        }
    }
}
