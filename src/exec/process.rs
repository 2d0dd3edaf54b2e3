// src/exec/process.rs

//! Spawning a trigger's command and waiting for it in the background.

use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use crate::config::Trigger;
use crate::exec::signal::KillSignal;

/// Handle to one started command instance.
///
/// The child itself is owned by a detached waiter task; this handle can only
/// ask that task to deliver the termination signal, or wait for it to see
/// the exit.
#[derive(Debug)]
pub struct ProcessHandle {
    terminate: Option<oneshot::Sender<KillSignal>>,
    exited: watch::Receiver<bool>,
}

impl ProcessHandle {
    /// Whether the waiter has not yet observed the process exit.
    pub fn is_running(&self) -> bool {
        !*self.exited.borrow()
    }

    /// Ask the waiter to send `signal` to the process group.
    ///
    /// Returns false (and does nothing) if the process already exited or a
    /// signal was already requested.
    pub fn terminate(&mut self, signal: KillSignal) -> bool {
        match self.terminate.take() {
            Some(tx) => tx.send(signal).is_ok(),
            None => false,
        }
    }

    /// Resolves once the waiter has reaped the process.
    pub async fn wait(mut self) {
        // Err only means the waiter is gone, which also implies the exit.
        let _ = self.exited.wait_for(|exited| *exited).await;
    }
}

/// Start `trigger.command` through the platform shell.
///
/// The child inherits this process's environment with `trigger.env` layered
/// on top, and its stdout and stderr. On Unix it leads its own process group
/// so the termination signal reaches everything it spawned. That group is in
/// the background of the terminal, so stdin is `/dev/null`: a read from the
/// tty would stop the child with SIGTTIN and it could no longer be signalled
/// out.
pub fn spawn_process(trigger: &Trigger) -> Result<ProcessHandle> {
    let mut cmd = shell_command(&trigger.command);
    cmd.envs(&trigger.env)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    #[cfg(unix)]
    cmd.process_group(0);

    let started = Instant::now();
    let child = cmd
        .spawn()
        .with_context(|| format!("spawning process for trigger '{}'", trigger.name))?;
    info!(trigger = %trigger.name, cmd = %trigger.command, pid = ?child.id(), "exec start");
    let trigger_name = trigger.name.clone();

    let (tx, rx) = oneshot::channel::<KillSignal>();
    let (exited_tx, exited_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_exit(trigger_name, child, rx, started).await;
        let _ = exited_tx.send(true);
    });

    Ok(ProcessHandle {
        terminate: Some(tx),
        exited: exited_rx,
    })
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Detached waiter: reports the exit and delivers at most one termination
/// request. Nobody awaits this task; shutdown waits on its exit notice.
async fn wait_for_exit(
    name: String,
    mut child: Child,
    mut terminate_rx: oneshot::Receiver<KillSignal>,
    started: Instant,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        request = &mut terminate_rx => {
            match request {
                Ok(signal) => send_signal(&name, &mut child, signal),
                Err(_) => debug!(trigger = %name, "process handle dropped without termination"),
            }
            child.wait().await
        }
    };

    report_exit(&name, status, started);
}

fn report_exit(name: &str, status: std::io::Result<ExitStatus>, started: Instant) {
    let elapsed = started.elapsed();
    match status {
        Ok(status) if status.success() => {
            info!(trigger = %name, elapsed = ?elapsed, "finish");
        }
        Ok(status) => {
            warn!(trigger = %name, status = %status, "program exited");
            info!(trigger = %name, elapsed = ?elapsed, "finish");
        }
        Err(err) => {
            warn!(trigger = %name, error = %err, "waiting for process failed");
        }
    }
}

#[cfg(unix)]
fn send_signal(name: &str, child: &mut Child, signal: KillSignal) {
    let Some(pid) = child.id() else {
        debug!(trigger = %name, "process already reaped; nothing to signal");
        return;
    };
    let pid = pid as libc::pid_t;

    // The child is its own group leader; fall back to the single pid if the
    // group is gone.
    // SAFETY: killpg only takes integers and touches no memory. The pid is
    // still ours because the child has not been reaped yet.
    let rc = unsafe { libc::killpg(pid, signal.number()) };
    if rc != 0 {
        // SAFETY: as above, plain integer arguments on an unreaped child.
        let rc = unsafe { libc::kill(pid, signal.number()) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            debug!(trigger = %name, pid, error = %err, "signal delivery failed");
        }
    }
}

#[cfg(not(unix))]
fn send_signal(name: &str, child: &mut Child, signal: KillSignal) {
    debug!(trigger = %name, signal = %signal, "signals unsupported on this platform; killing");
    if let Err(err) = child.start_kill() {
        debug!(trigger = %name, error = %err, "kill failed");
    }
}
