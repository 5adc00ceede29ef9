use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Сообщение пользователю о результате действия
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, "Информация", body)
    }

    pub fn success(body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, "Готово", body)
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, "Ошибка", body)
    }

    fn new(kind: NoticeKind, title: &str, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            body: body.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.title, self.body)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Информационные сообщения в stdout, ошибки в stderr
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        // Закрытый stdout/stderr не должен ронять утилиту
        let _ = match notice.kind {
            NoticeKind::Info | NoticeKind::Success => writeln!(std::io::stdout(), "{}", notice),
            NoticeKind::Error => writeln!(std::io::stderr(), "{}", notice),
        };
    }
}
