//! SIF_Error categories and codes

use serde::{Deserialize, Serialize};
use std::fmt;

/// SIF_Error/SIF_Category values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ErrorCategory {
    Unknown = 0,
    XmlValidation = 1,
    Encryption = 2,
    Authentication = 3,
    AccessPermissions = 4,
    Registration = 5,
    Provisioning = 6,
    Subscription = 7,
    RequestResponse = 8,
    EventReporting = 9,
    Transport = 10,
    System = 11,
    GenericMessageHandling = 12,
    SmbHandling = 13,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 14] = [
        ErrorCategory::Unknown,
        ErrorCategory::XmlValidation,
        ErrorCategory::Encryption,
        ErrorCategory::Authentication,
        ErrorCategory::AccessPermissions,
        ErrorCategory::Registration,
        ErrorCategory::Provisioning,
        ErrorCategory::Subscription,
        ErrorCategory::RequestResponse,
        ErrorCategory::EventReporting,
        ErrorCategory::Transport,
        ErrorCategory::System,
        ErrorCategory::GenericMessageHandling,
        ErrorCategory::SmbHandling,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Unknown => "Unknown",
            ErrorCategory::XmlValidation => "XML Validation",
            ErrorCategory::Encryption => "Encryption",
            ErrorCategory::Authentication => "Authentication",
            ErrorCategory::AccessPermissions => "Access and Permissions",
            ErrorCategory::Registration => "Registration",
            ErrorCategory::Provisioning => "Provisioning",
            ErrorCategory::Subscription => "Subscription",
            ErrorCategory::RequestResponse => "Request and Response",
            ErrorCategory::EventReporting => "Event Reporting and Processing",
            ErrorCategory::Transport => "Transport",
            ErrorCategory::System => "System",
            ErrorCategory::GenericMessageHandling => "Generic Message Handling",
            ErrorCategory::SmbHandling => "SMB Handling",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// SIF_Code values, grouped by category
pub mod codes {
    pub const GENERIC: u32 = 1;

    pub mod xml_validation {
        pub const MESSAGE_NOT_WELL_FORMED: u32 = 2;
        pub const INVALID_ELEMENT: u32 = 3;
        pub const MISSING_MANDATORY: u32 = 5;
    }

    pub mod authentication {
        pub const SENDER_CERTIFICATE_INVALID: u32 = 2;
        pub const CERTIFICATE_REVOKED: u32 = 4;
    }

    pub mod access {
        pub const NO_PERMISSION_TO_REGISTER: u32 = 2;
        pub const NO_PERMISSION_TO_PROVIDE: u32 = 3;
        pub const NO_PERMISSION_TO_SUBSCRIBE: u32 = 4;
        pub const NO_PERMISSION_TO_REQUEST: u32 = 5;
    }

    pub mod registration {
        pub const INVALID_SOURCE_ID: u32 = 2;
        pub const UNSUPPORTED_TRANSPORT: u32 = 3;
        pub const UNSUPPORTED_VERSION: u32 = 4;
        pub const BUFFER_TOO_SMALL: u32 = 5;
        pub const SECURE_TRANSPORT_REQUIRED: u32 = 6;
        pub const PUSH_NOT_SUPPORTED: u32 = 7;
        pub const NOT_REGISTERED: u32 = 9;
    }

    pub mod provisioning {
        pub const INVALID_OBJECT: u32 = 2;
        pub const ALREADY_PROVIDED: u32 = 3;
        pub const NOT_PROVIDER: u32 = 4;
    }

    pub mod subscription {
        pub const NOT_SUBSCRIBED: u32 = 2;
        pub const INVALID_OBJECT: u32 = 3;
    }

    pub mod request_response {
        pub const INVALID_DESTINATION: u32 = 2;
        pub const NO_PROVIDER: u32 = 4;
        pub const UNSUPPORTED_QUERY_ELEMENT: u32 = 5;
        pub const UNSUPPORTED_VERSION: u32 = 6;
        pub const RESPONSE_TOO_LARGE: u32 = 7;
        pub const INVALID_CONTEXT: u32 = 12;
    }

    pub mod transport {
        pub const UNSUPPORTED_PROTOCOL: u32 = 2;
        pub const SECURE_CHANNEL_UNAVAILABLE: u32 = 3;
        pub const CONNECTION_FAILED: u32 = 4;
    }

    pub mod system {
        pub const OUT_OF_RESOURCES: u32 = 2;
        pub const UNAVAILABLE: u32 = 3;
    }
}

/// Protocol-level error details carried by an exception
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SifError {
    pub category: ErrorCategory,
    pub code: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_description: Option<String>,
}

impl SifError {
    pub fn new(category: ErrorCategory, code: u32, description: impl Into<String>) -> Self {
        Self {
            category,
            code,
            description: description.into(),
            extended_description: None,
        }
    }

    pub fn with_extended(mut self, extended: impl Into<String>) -> Self {
        self.extended_description = Some(extended.into());
        self
    }

    pub fn matches(&self, category: ErrorCategory, code: Option<u32>) -> bool {
        self.category == category && code.map_or(true, |c| c == self.code)
    }
}

impl fmt::Display for SifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Category={} ({}); Code={}] {}",
            self.category.code(),
            self.category,
            self.code,
            self.description
        )?;
        if let Some(extended) = &self.extended_description {
            write!(f, ". {}", extended)?;
        }
        Ok(())
    }
}
