use thiserror::Error;

#[derive(Error, Debug)]
pub enum VmonError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Команда `{command}` завершилась с ошибкой ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Утилита недоступна: {0}")]
    ToolUnavailable(String),

    #[error("Не удалось разобрать вывод: {0}")]
    Parse(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),
}

impl VmonError {
    pub fn is_command_failure(&self) -> bool {
        matches!(self, VmonError::CommandFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, VmonError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! vmon_error {
    (parse, $($arg:tt)*) => {
        $crate::error::VmonError::Parse(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::VmonError::ServiceUnavailable(format!($($arg)*))
    };
}
