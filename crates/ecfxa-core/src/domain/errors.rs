use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EcfResult<T> = Result<T, EcfError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcfErrorCategory {
    Configuration,
    DataLoad,
    OutOfRange,
    Internal,
}

impl EcfErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Configuration => 2,
            Self::DataLoad => 3,
            Self::OutOfRange => 4,
            Self::Internal => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::DataLoad => "DataLoadError",
            Self::OutOfRange => "OutOfRangeError",
            Self::Internal => "InternalError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcfError {
    category: EcfErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl EcfError {
    pub fn new(
        category: EcfErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn configuration(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EcfErrorCategory::Configuration, placeholder, message)
    }

    pub fn data_load(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EcfErrorCategory::DataLoad, placeholder, message)
    }

    pub fn out_of_range(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EcfErrorCategory::OutOfRange, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(EcfErrorCategory::Internal, placeholder, message)
    }

    pub const fn category(&self) -> EcfErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for EcfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for EcfError {}
