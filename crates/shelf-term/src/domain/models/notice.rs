/// A short-lived status message shown to the user after an operation
/// settles. At most one notice is visible at any instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(text: &str) -> Notice {
        return Notice {
            text: text.to_string(),
            is_error: false,
        };
    }

    pub fn error(text: &str) -> Notice {
        return Notice {
            text: text.to_string(),
            is_error: true,
        };
    }
}
