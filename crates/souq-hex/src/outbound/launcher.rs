use std::process::Command;

use crate::config::Config;
use crate::errors::BootstrapError;

/// The request-serving process the bootstrap hands off to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchPlan {
    /// `APP_SERVER` may carry leading arguments (`python -m gunicorn`); the
    /// bind address, worker count and app module are appended.
    pub fn from_config(config: &Config) -> Result<Self, BootstrapError> {
        let port = config.require_port()?;
        let mut words = config.app_server.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| BootstrapError::Config("APP_SERVER is empty".into()))?;

        let mut args: Vec<String> = words.collect();
        args.extend([
            "--bind".to_string(),
            format!("0.0.0.0:{port}"),
            "--workers".to_string(),
            config.workers.to_string(),
            config.app_module.clone(),
        ]);
        Ok(Self { program, args })
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Replaces the current process image. Only returns on failure.
    #[cfg(unix)]
    pub fn exec(&self) -> BootstrapError {
        use std::os::unix::process::CommandExt;

        tracing::info!(program = %self.program, args = ?self.args, "handing off to app server");
        let source = self.command().exec();
        BootstrapError::Launch {
            program: self.program.clone(),
            source,
        }
    }

    /// Without `exec`, run the server as a child and mirror its exit status.
    #[cfg(not(unix))]
    pub fn exec(&self) -> BootstrapError {
        tracing::info!(program = %self.program, args = ?self.args, "starting app server");
        match self.command().status() {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(source) => BootstrapError::Launch {
                program: self.program.clone(),
                source,
            },
        }
    }
}
