//! Заранее расписанный runner для тестов: запоминает все вызовы и отвечает
//! по первому совпавшему правилу. Без правила команда считается успешной.

use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::{Result, VmonError};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;

enum Matcher {
    Exact(String),
    Prefix(String),
    Program(String),
}

impl Matcher {
    fn matches(&self, command: &CommandSpec, rendered: &str) -> bool {
        match self {
            Matcher::Exact(text) => rendered == text,
            Matcher::Prefix(text) => rendered.starts_with(text.as_str()),
            Matcher::Program(program) => &command.program == program,
        }
    }
}

enum Response {
    Output(CommandOutput),
    Missing,
}

struct Rule {
    matcher: Matcher,
    response: Response,
    remaining: Option<usize>,
}

#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    started: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_rule(self, matcher: Matcher, response: Response, remaining: Option<usize>) -> Self {
        self.rules.lock().push(Rule {
            matcher,
            response,
            remaining,
        });
        self
    }

    pub fn respond_exact(self, command: &str, output: CommandOutput) -> Self {
        self.with_rule(Matcher::Exact(command.to_string()), Response::Output(output), None)
    }

    pub fn fail_prefix(self, prefix: &str, status: i32, stderr: &str) -> Self {
        self.with_rule(
            Matcher::Prefix(prefix.to_string()),
            Response::Output(CommandOutput::failed(status, stderr)),
            None,
        )
    }

    /// Первые `times` совпавших вызовов завершаются ошибкой, дальше успех
    pub fn fail_prefix_times(self, prefix: &str, times: usize, status: i32, stderr: &str) -> Self {
        self.with_rule(
            Matcher::Prefix(prefix.to_string()),
            Response::Output(CommandOutput::failed(status, stderr)),
            Some(times),
        )
    }

    /// Имитирует отсутствие утилиты в системе
    pub fn missing(self, program: &str) -> Self {
        self.with_rule(Matcher::Program(program.to_string()), Response::Missing, None)
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().clone()
    }

    pub fn calls_handle(&self) -> Arc<Mutex<Vec<CommandSpec>>> {
        self.calls.clone()
    }

    /// Момент запуска каждой команды (по часам tokio, учитывает паузу времени в тестах)
    pub fn timed_calls(&self) -> Vec<(String, Instant)> {
        self.started.lock().clone()
    }

    pub fn rendered_calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(ToString::to_string).collect()
    }
}

#[async_trait::async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        self.calls.lock().push(command.clone());
        let rendered = command.to_string();
        self.started.lock().push((rendered.clone(), Instant::now()));

        let mut rules = self.rules.lock();
        for rule in rules.iter_mut() {
            if rule.remaining == Some(0) || !rule.matcher.matches(command, &rendered) {
                continue;
            }
            if let Some(remaining) = rule.remaining.as_mut() {
                *remaining -= 1;
            }
            return match &rule.response {
                Response::Output(output) => Ok(output.clone()),
                Response::Missing => Err(VmonError::ToolUnavailable(format!(
                    "{} не найден ({})",
                    command.program, rendered
                ))),
            };
        }

        Ok(CommandOutput::ok(""))
    }
}
