use crate::split::SplitLabel;

/// Constants used by snippet discovery and decoding.
pub mod collector {
    /// File extension (without dot) identifying eligible snippet files.
    pub const SNIPPET_EXTENSION: &str = "ahk";
    /// Category assigned to files that sit directly under the input root.
    pub const DEFAULT_CATEGORY: &str = "uncategorized";
    /// UTF-8 byte-order mark stripped from decoded file contents.
    pub const UTF8_BOM: char = '\u{feff}';
}

/// Constants used by prompt rendering.
pub mod prompt {
    /// Opening line for snippet prompts.
    pub const SNIPPET_HEADER: &str =
        "You are maintaining a knowledge base of AutoHotkey examples.";
    /// Task instruction appended to snippet prompts.
    pub const SNIPPET_INSTRUCTION: &str =
        "Return the exact AutoHotkey v2 snippet associated with this reference.";
    /// Opening line for reference-entry prompts.
    pub const REFERENCE_HEADER: &str =
        "You are maintaining a knowledge base of AutoHotkey reference entries.";
    /// Task instruction appended to reference-entry prompts.
    pub const REFERENCE_INSTRUCTION: &str =
        "Provide the official description and any pertinent usage details.";
}

/// Constants used by the reference CSV loader.
pub mod reference {
    /// Required column holding the element name.
    pub const COL_NAME: &str = "Name";
    /// Required column holding the element description.
    pub const COL_DESCRIPTION: &str = "Description";
    /// Optional column holding the element kind (function, variable, ...).
    pub const COL_ELEMENT_TYPE: &str = "ElementType";
    /// Optional column naming the documentation source file.
    pub const COL_SOURCE_FILE: &str = "SourceFile";
    /// Optional column holding the logical category path.
    pub const COL_PATH: &str = "Path";
    /// Optional column holding the signature type.
    pub const COL_TYPE: &str = "Type";
    /// Optional column holding the return type.
    pub const COL_RETURN_TYPE: &str = "ReturnType";
    /// Optional column holding the associated symbol.
    pub const COL_SYMBOL: &str = "Symbol";
    /// Optional column holding the parameter list.
    pub const COL_PARAMETERS: &str = "Parameters";
    /// Element type used when the column is absent or blank.
    pub const DEFAULT_ELEMENT_TYPE: &str = "Unknown";
    /// Columns consumed by the loader; anything else lands in the metadata side-bag.
    pub const KNOWN_COLUMNS: [&str; 9] = [
        COL_NAME,
        COL_DESCRIPTION,
        COL_ELEMENT_TYPE,
        COL_SOURCE_FILE,
        COL_PATH,
        COL_TYPE,
        COL_RETURN_TYPE,
        COL_SYMBOL,
        COL_PARAMETERS,
    ];
}

/// Constants used by split assignment.
pub mod splits {
    use super::SplitLabel;

    /// Default shuffle seed for split assignment.
    pub const DEFAULT_SEED: u64 = 2025;
    /// Default train ratio.
    pub const DEFAULT_TRAIN_RATIO: f32 = 0.8;
    /// Default validation ratio.
    pub const DEFAULT_VALIDATION_RATIO: f32 = 0.1;
    /// Default test ratio.
    pub const DEFAULT_TEST_RATIO: f32 = 0.1;
    /// Canonical split iteration order used by writers and summaries.
    pub const ALL_SPLITS: [SplitLabel; 3] =
        [SplitLabel::Train, SplitLabel::Validation, SplitLabel::Test];
}

/// Constants used by JSONL emission.
pub mod writer {
    /// Default input root for snippet discovery.
    pub const DEFAULT_INPUT_DIR: &str = "data/raw_scripts";
    /// Default output directory for split files.
    pub const DEFAULT_OUTPUT_DIR: &str = "data/prepared";
    /// Default train split filename.
    pub const TRAIN_FILENAME: &str = "train.jsonl";
    /// Default validation split filename.
    pub const VAL_FILENAME: &str = "val.jsonl";
    /// Default test split filename.
    pub const TEST_FILENAME: &str = "test.jsonl";
}

/// Constants used by the harmony chat-schema projection.
pub mod harmony {
    /// Role label for the leading system message.
    pub const SYSTEM_ROLE: &str = "system";
    /// Role label for the user message carrying the prompt.
    pub const USER_ROLE: &str = "user";
    /// Role label for the assistant message carrying the response.
    pub const ASSISTANT_ROLE: &str = "assistant";
    /// Fixed system message attached to every projected record.
    pub const SYSTEM_MESSAGE: &str = "Reasoning medium. You are a helpful assistant.";
    /// Number of messages in every harmony record.
    pub const MESSAGE_COUNT: usize = 3;
}
