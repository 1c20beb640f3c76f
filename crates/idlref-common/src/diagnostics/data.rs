use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const IDL_SYNTAX_ERROR: u32 = 1001;
    pub const MISSING_IDL_DEFINITION: u32 = 2001;
    pub const DUPLICATE_DEFINITION: u32 = 2002;
    pub const IDL_VALIDATION: u32 = 3001;
    pub const XREF_NO_MATCHING_SPEC: u32 = 4001;
    pub const XREF_AMBIGUOUS: u32 = 4002;
    pub const XREF_INFORMATIVE_IN_NORMATIVE: u32 = 4003;
    pub const XREF_LOOKUP_FAILED: u32 = 4004;
}

pub mod diagnostic_messages {
    pub const IDL_SYNTAX_ERROR: &str = "Failed to parse WebIDL: {0}";
    pub const MISSING_IDL_DEFINITION: &str = "Missing `<dfn>` for{0} `{1}` {2}.";
    pub const DUPLICATE_DEFINITION: &str = "Duplicate definition of{0} `{1}`.";
    pub const IDL_VALIDATION: &str = "WebIDL validation error ({0}): {1}";
    pub const XREF_NO_MATCHING_SPEC: &str =
        "Couldn't match \"{0}\" to anything in the cited specifications: {1}.";
    pub const XREF_AMBIGUOUS: &str =
        "The term \"{0}\" is defined in multiple specifications: {1}. Add a `data-cite` to pick one.";
    pub const XREF_INFORMATIVE_IN_NORMATIVE: &str =
        "Informative term \"{0}\" from [{1}] is used in a normative context.";
    pub const XREF_LOOKUP_FAILED: &str = "Cross-reference lookup failed: {0}";
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::IDL_SYNTAX_ERROR,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::IDL_SYNTAX_ERROR,
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_IDL_DEFINITION,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::MISSING_IDL_DEFINITION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_DEFINITION,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::DUPLICATE_DEFINITION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::IDL_VALIDATION,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::IDL_VALIDATION,
    },
    DiagnosticMessage {
        code: diagnostic_codes::XREF_NO_MATCHING_SPEC,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::XREF_NO_MATCHING_SPEC,
    },
    DiagnosticMessage {
        code: diagnostic_codes::XREF_AMBIGUOUS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::XREF_AMBIGUOUS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::XREF_INFORMATIVE_IN_NORMATIVE,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::XREF_INFORMATIVE_IN_NORMATIVE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::XREF_LOOKUP_FAILED,
        category: DiagnosticCategory::Warning,
        message: diagnostic_messages::XREF_LOOKUP_FAILED,
    },
];
