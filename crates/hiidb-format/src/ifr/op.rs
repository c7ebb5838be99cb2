//! Opcode tags and flag bits.

/// Size of the `[op][len]` record header.
pub const OP_HEADER_SIZE: usize = 2;

/// Option/question flag: default for the standard class.
pub const FLAG_DEFAULT: u8 = 0x01;
/// Option/question flag: default for the manufacturing class.
pub const FLAG_MANUFACTURING: u8 = 0x02;
/// Question flag: callback-driven; carried through, never interpreted here.
pub const FLAG_INTERACTIVE: u8 = 0x04;

/// Opcode tags.
///
/// Unknown tags are legal in a stream — records self-describe their length,
/// so walkers skip what they do not understand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    Form = 0x01,
    Subtitle = 0x02,
    Text = 0x03,
    OneOf = 0x05,
    Checkbox = 0x06,
    Numeric = 0x07,
    Password = 0x08,
    OneOfOption = 0x09,
    StringField = 0x0A,
    EndForm = 0x0B,
    EndFormSet = 0x0D,
    FormSet = 0x0E,
    EndOneOf = 0x10,
    Label = 0x1D,
    OrderedList = 0x23,
    VarStore = 0x24,
    VarStoreSelect = 0x25,
}

impl Opcode {
    /// Convert from the raw tag byte.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0x01 => Some(Self::Form),
            0x02 => Some(Self::Subtitle),
            0x03 => Some(Self::Text),
            0x05 => Some(Self::OneOf),
            0x06 => Some(Self::Checkbox),
            0x07 => Some(Self::Numeric),
            0x08 => Some(Self::Password),
            0x09 => Some(Self::OneOfOption),
            0x0A => Some(Self::StringField),
            0x0B => Some(Self::EndForm),
            0x0D => Some(Self::EndFormSet),
            0x0E => Some(Self::FormSet),
            0x10 => Some(Self::EndOneOf),
            0x1D => Some(Self::Label),
            0x23 => Some(Self::OrderedList),
            0x24 => Some(Self::VarStore),
            0x25 => Some(Self::VarStoreSelect),
            _ => None,
        }
    }

    /// Whether this opcode terminates a run for patching purposes.
    pub fn is_terminator(self) -> bool {
        matches!(self, Self::EndForm | Self::EndFormSet)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Subtitle => "subtitle",
            Self::Text => "text",
            Self::OneOf => "one-of",
            Self::Checkbox => "checkbox",
            Self::Numeric => "numeric",
            Self::Password => "password",
            Self::OneOfOption => "one-of-option",
            Self::StringField => "string",
            Self::EndForm => "end-form",
            Self::EndFormSet => "end-formset",
            Self::FormSet => "formset",
            Self::EndOneOf => "end-one-of",
            Self::Label => "label",
            Self::OrderedList => "ordered-list",
            Self::VarStore => "varstore",
            Self::VarStoreSelect => "varstore-select",
        }
    }
}
