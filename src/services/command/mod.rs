//! Запуск внешних утилит (xrandr, xinput, ps, pkill, gtf).
//!
//! Этот модуль отвечает ТОЛЬКО за запуск процессов и сбор их вывода.
//! Разбор вывода и порядок команд живут в соответствующих сервисах.

mod dry_run_runner;
mod retry;
mod system_runner;
mod r#trait;

#[cfg(test)]
pub mod scripted;

pub use self::r#trait::{create_command_runner, CommandRunner};
pub use retry::run_with_retry;

use std::fmt;

/// Описание запускаемой команды
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn xrandr() -> Self {
        Self::new("xrandr")
    }

    pub fn xinput() -> Self {
        Self::new("xinput")
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Команда только читает состояние и ничего не меняет
    pub fn is_query(&self) -> bool {
        let first = self.args.first().map(String::as_str);
        match self.program.as_str() {
            "xrandr" => matches!(first, None | Some("--query") | Some("-q") | Some("--current")),
            "xinput" => matches!(first, Some("list") | Some("--list")),
            "ps" | "gtf" => true,
            _ => false,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Результат выполнения команды
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Код возврата; `None`, если процесс завершён сигналом
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("код {}", code),
            None => "прерван сигналом".to_string(),
        }
    }
}
