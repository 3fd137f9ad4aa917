/// Storage type of a column as declared to a specific engine.
///
/// `db::Type` is what appears in `CREATE TABLE` statements. Abstract field
/// types are projected onto it by [`crate::schema::mapping::to_engine_type`];
/// each dialect renders it with its own spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A boolean value
    Boolean,

    /// An integer of `bytes` bytes.
    Integer {
        bytes: u8,
        unsigned: bool,
        zerofill: bool,
        /// Display width, honored by engines that have one.
        width: Option<u32>,
    },

    /// A floating point number of `n` bytes (4 or 8).
    Float(u8),

    /// Decimal number with optional precision and scale.
    /// - `None`: Arbitrary-precision decimal
    /// - `Some((precision, scale))`: Fixed precision and scale
    Numeric(Option<(u32, u32)>),

    /// Fixed-length text.
    Char { length: u64, binary: bool },

    /// Text type with an explicit maximum length
    VarChar { length: u64, binary: bool },

    /// Unconstrained text type
    Text,

    /// Unconstrained binary type
    Blob,

    /// 128-bit universally unique identifier (UUID)
    Uuid,

    Json,

    /// Binary JSON, on engines that distinguish it from `Json`.
    Jsonb,

    /// Text restricted to a fixed list of values.
    Enum(Vec<String>),

    /// An instant in time, with time zone where the engine supports it.
    Timestamp,

    /// A civil date.
    Date,

    /// A civil wall-clock time.
    Time,

    /// Engine-specific type, rendered verbatim.
    Custom(String),
}

impl Type {
    pub fn integer(bytes: u8) -> Type {
        Type::Integer {
            bytes,
            unsigned: false,
            zerofill: false,
            width: None,
        }
    }

    pub fn varchar(length: u64) -> Type {
        Type::VarChar {
            length,
            binary: false,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer { .. })
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Type::Json | Type::Jsonb)
    }

    /// Returns `true` for types whose values travel as strings.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Type::Char { .. }
                | Type::VarChar { .. }
                | Type::Text
                | Type::Uuid
                | Type::Enum(_)
                | Type::Timestamp
                | Type::Date
                | Type::Time
                | Type::Custom(_)
        )
    }
}
