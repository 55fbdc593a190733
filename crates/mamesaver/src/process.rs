use std::{
    io::{self, Read},
    path::PathBuf,
    process::{Child, Command, Stdio},
};

/// Everything needed to start an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_directory: PathBuf,
    /// Pipe standard output so [ProcessHandle::read_all_output] can collect it
    pub capture_stdout: bool,
}

pub trait ProcessHandle: Send {
    fn has_exited(&mut self) -> bool;

    /// Asks the program to shut itself down, this never blocks and never force kills
    fn request_close(&mut self);

    /// Only meaningful when stdout was captured
    fn read_all_output(&mut self) -> io::Result<String>;

    /// Returns whether the program exited successfully
    fn wait_for_exit(&mut self) -> io::Result<bool>;
}

pub trait ProcessLauncher {
    type Handle: ProcessHandle;

    fn start(&self, request: &ProcessRequest) -> io::Result<Self::Handle>;
}

/// Launches real operating system processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    type Handle = ChildHandle;

    fn start(&self, request: &ProcessRequest) -> io::Result<Self::Handle> {
        let mut command = Command::new(&request.program);
        command
            .args(&request.args)
            .current_dir(&request.working_directory)
            .stdin(Stdio::null());

        if request.capture_stdout {
            command.stdout(Stdio::piped()).stderr(Stdio::null());
        }

        tracing::debug!("Starting {:?}", command);

        Ok(ChildHandle {
            child: Some(command.spawn()?),
        })
    }
}

#[derive(Debug)]
pub struct ChildHandle {
    // Only taken on drop
    child: Option<Child>,
}

impl ChildHandle {
    fn child(&mut self) -> &mut Child {
        self.child.as_mut().expect("Child is only taken on drop")
    }
}

impl ProcessHandle for ChildHandle {
    fn has_exited(&mut self) -> bool {
        // An error here means the child is gone as far as we can tell
        !matches!(self.child().try_wait(), Ok(None))
    }

    fn request_close(&mut self) {
        let pid = self.child().id();

        let spawned = if cfg!(windows) {
            // Without /F this is a polite WM_CLOSE
            Command::new("taskkill")
                .args(["/PID", &pid.to_string()])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
        } else {
            Command::new("kill")
                .args(["-TERM", &pid.to_string()])
                .stderr(Stdio::null())
                .spawn()
        };

        let mut helper = match spawned {
            Ok(helper) => helper,
            Err(err) => {
                tracing::warn!("Could not request process {} to close: {}", pid, err);
                return;
            }
        };

        // The helper is reaped off the calling thread
        std::thread::spawn(move || match helper.wait() {
            Ok(status) if status.success() => {
                tracing::debug!("Requested process {} to close", pid);
            }
            Ok(status) => {
                tracing::warn!("Close request for process {} returned {}", pid, status);
            }
            Err(err) => {
                tracing::warn!("Could not request process {} to close: {}", pid, err);
            }
        });
    }

    fn read_all_output(&mut self) -> io::Result<String> {
        let mut output = String::new();

        if let Some(stdout) = self.child().stdout.as_mut() {
            stdout.read_to_string(&mut output)?;
        }

        Ok(output)
    }

    fn wait_for_exit(&mut self) -> io::Result<bool> {
        Ok(self.child().wait()?.success())
    }
}

impl Drop for ChildHandle {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        // Overrunning games are left to finish on their own, but still get reaped
        if let Ok(None) = child.try_wait() {
            std::thread::spawn(move || {
                let _ = child.wait();
            });
        }
    }
}
