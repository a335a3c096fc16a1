//! Blocking child-process execution with enforced timeouts.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use sprout_core::application::ports::{CommandOutput, CommandRunner};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs commands via `std::process`, always with an explicit working
/// directory and a hard deadline. An expired deadline kills the child and
/// reports `io::ErrorKind::TimedOut`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, argv: &[&str], cwd: &Path, timeout: Duration) -> io::Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty argv"))?;

        debug!(command = %argv.join(" "), cwd = %cwd.display(), "spawning");
        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain the pipes on their own threads so a chatty child (npm)
        // cannot fill the pipe buffer and deadlock against our wait loop.
        let stdout = capture(child.stdout.take());
        let stderr = capture(child.stderr.take());

        let status = wait_with_deadline(&mut child, program, timeout)?;

        Ok(CommandOutput {
            exit_code: status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }
}

fn wait_with_deadline(child: &mut Child, program: &str, timeout: Duration) -> io::Result<i32> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            // Terminated by signal yields no code; report a generic failure.
            return Ok(status.code().unwrap_or(-1));
        }
        if Instant::now() >= deadline {
            warn!(%program, timeout_secs = timeout.as_secs(), "command timed out, killing");
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("{program} did not finish within {}s", timeout.as_secs()),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn capture<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut buf);
        }
        buf
    })
}
