use std::error::Error;
use std::fmt::{Display, Formatter};

pub type XsdirResult<T> = Result<T, XsdirError>;
pub type ParserResult<T> = XsdirResult<T>;
pub type DatabaseResult<T> = XsdirResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XsdirErrorCategory {
    InputValidationError,
    IoSystemError,
    FormatError,
    ConsistencyError,
    InvalidRequestError,
    InternalError,
}

impl XsdirErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::FormatError | Self::ConsistencyError | Self::InvalidRequestError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::FormatError => "FormatError",
            Self::ConsistencyError => "ConsistencyError",
            Self::InvalidRequestError => "InvalidRequestError",
            Self::InternalError => "InternalError",
        }
    }
}

impl Display for XsdirErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XsdirError {
    category: XsdirErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl XsdirError {
    pub fn new(
        category: XsdirErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(XsdirErrorCategory::InputValidationError, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(XsdirErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn format(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(XsdirErrorCategory::FormatError, placeholder, message)
    }

    pub fn consistency(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(XsdirErrorCategory::ConsistencyError, placeholder, message)
    }

    pub fn invalid_request(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(XsdirErrorCategory::InvalidRequestError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(XsdirErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> XsdirErrorCategory {
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

impl Display for XsdirError {
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

impl Error for XsdirError {}

#[cfg(test)]
mod tests {
    use super::{XsdirError, XsdirErrorCategory};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (XsdirErrorCategory::InputValidationError, 2),
            (XsdirErrorCategory::IoSystemError, 3),
            (XsdirErrorCategory::FormatError, 4),
            (XsdirErrorCategory::ConsistencyError, 4),
            (XsdirErrorCategory::InvalidRequestError, 4),
            (XsdirErrorCategory::InternalError, 5),
        ];

        for (category, exit_code) in cases {
            assert_eq!(category.exit_code(), exit_code, "{category}");
        }
    }

    #[test]
    fn consistency_error_renders_diagnostic_lines() {
        let error = XsdirError::consistency(
            "DB.MISSING_NUCLIDE",
            "nuclide properties for zaid 1001 have not been initialized",
        );

        assert_eq!(error.exit_code(), 4);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [DB.MISSING_NUCLIDE] nuclide properties for zaid 1001 have not been initialized"
        );
        assert_eq!(error.fatal_exit_line(), "FATAL EXIT CODE: 4");
        assert_eq!(
            error.to_string(),
            "ConsistencyError [DB.MISSING_NUCLIDE] nuclide properties for zaid 1001 have not been initialized"
        );
    }
}
