//! Hand-written parser for compact type and method signatures.
//!
//! The grammar mirrors descriptor strings used in binding declarations:
//! zero or more `[` array markers, then a one-character primitive code
//! (`Z C B S I J F D`) or a reference form `L<qualified name>;`. A method
//! signature is a parenthesized, ordered parameter list followed by one
//! return signature, where the return may additionally be `V` (void).
//!
//! Examples: `I`, `[[D`, `Ldemo.Counter;`, `(ILlang.String;)Z`, `()V`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignatureError};

/// Primitive scalar kinds of the boxed calling convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Scalar {
    /// Single-character code used in compact signatures.
    pub fn code(self) -> char {
        match self {
            Scalar::Boolean => 'Z',
            Scalar::Char => 'C',
            Scalar::Byte => 'B',
            Scalar::Short => 'S',
            Scalar::Int => 'I',
            Scalar::Long => 'J',
            Scalar::Float => 'F',
            Scalar::Double => 'D',
        }
    }

    fn from_code(code: char) -> Option<Scalar> {
        Some(match code {
            'Z' => Scalar::Boolean,
            'C' => Scalar::Char,
            'B' => Scalar::Byte,
            'S' => Scalar::Short,
            'I' => Scalar::Int,
            'J' => Scalar::Long,
            'F' => Scalar::Float,
            'D' => Scalar::Double,
            _ => return None,
        })
    }
}

/// A parsed type signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeSig {
    /// No value. Only valid as a method return type.
    Void,
    /// A primitive scalar.
    Primitive(Scalar),
    /// An array of `element`, `depth` dimensions deep.
    /// The element is never itself an array.
    Array { element: Box<TypeSig>, depth: u8 },
    /// A reference to a registered type by qualified name.
    Reference(String),
}

impl TypeSig {
    /// Parse a standalone type signature, e.g. a field descriptor.
    ///
    /// Void is rejected here; it only makes sense as a method return type.
    pub fn parse(input: &str) -> Result<TypeSig> {
        let mut cursor = Cursor::new(input);
        let sig = cursor.parse_type(false)?;
        cursor.expect_end()?;
        Ok(sig)
    }

    /// Whether the leaf type is not a reference.
    pub fn is_primitive(&self) -> bool {
        !matches!(self.leaf(), TypeSig::Reference(_))
    }

    /// Whether this signature has array dimensions.
    pub fn is_array(&self) -> bool {
        self.depth() > 0
    }

    /// Number of array dimensions; zero for non-arrays.
    pub fn depth(&self) -> u8 {
        match self {
            TypeSig::Array { depth, .. } => *depth,
            _ => 0,
        }
    }

    /// The non-array leaf of this signature.
    pub fn leaf(&self) -> &TypeSig {
        match self {
            TypeSig::Array { element, .. } => element,
            other => other,
        }
    }
}

impl fmt::Display for TypeSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSig::Void => write!(f, "V"),
            TypeSig::Primitive(s) => write!(f, "{}", s.code()),
            TypeSig::Array { element, depth } => {
                for _ in 0..*depth {
                    write!(f, "[")?;
                }
                write!(f, "{element}")
            }
            TypeSig::Reference(name) => write!(f, "L{name};"),
        }
    }
}

/// A parsed method signature: ordered parameters plus one return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSig {
    /// Parameter types, in declaration order.
    pub params: Vec<TypeSig>,
    /// Return type; may be [`TypeSig::Void`].
    pub ret: TypeSig,
}

impl MethodSig {
    /// Parse a method signature, e.g. `(ILlang.String;D)F`.
    pub fn parse(input: &str) -> Result<MethodSig> {
        let mut cursor = Cursor::new(input);
        if cursor.peek() != Some('(') {
            return Err(if cursor.at_end() {
                SignatureError::Empty
            } else {
                SignatureError::MissingParameterList
            });
        }
        cursor.bump();

        let mut params = Vec::new();
        loop {
            match cursor.peek() {
                Some(')') => {
                    cursor.bump();
                    break;
                }
                Some(_) => params.push(cursor.parse_type(false)?),
                None => return Err(SignatureError::UnterminatedParameterList),
            }
        }

        let ret = cursor.parse_type(true)?;
        cursor.expect_end()?;
        Ok(MethodSig { params, ret })
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for p in &self.params {
            write!(f, "{p}")?;
        }
        write!(f, "){}", self.ret)
    }
}

/// Character cursor over a signature string.
struct Cursor<'a> {
    input: &'a str,
    chars: std::str::CharIndices<'a>,
    peeked: Option<(usize, char)>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Cursor<'a> {
        let mut chars = input.char_indices();
        let peeked = chars.next();
        Cursor {
            input,
            chars,
            peeked,
        }
    }

    fn peek(&self) -> Option<char> {
        self.peeked.map(|(_, c)| c)
    }

    fn at_end(&self) -> bool {
        self.peeked.is_none()
    }

    /// Byte offset of the next character, or the input length at the end.
    fn offset(&self) -> usize {
        self.peeked.map_or(self.input.len(), |(i, _)| i)
    }

    fn bump(&mut self) -> Option<char> {
        let current = self.peeked;
        self.peeked = self.chars.next();
        current.map(|(_, c)| c)
    }

    fn expect_end(&self) -> Result<()> {
        match self.peeked {
            None => Ok(()),
            Some((i, _)) => Err(SignatureError::Trailing {
                rest: self.input[i..].to_string(),
            }),
        }
    }

    /// Parse one type form: array markers, then a leaf.
    fn parse_type(&mut self, allow_void: bool) -> Result<TypeSig> {
        if self.at_end() {
            return Err(SignatureError::Empty);
        }

        let mut depth: u8 = 0;
        while self.peek() == Some('[') {
            self.bump();
            depth = depth.saturating_add(1);
        }

        let at = self.offset();
        let leaf = match self.peek() {
            None => return Err(SignatureError::Truncated { at }),
            Some('V') => {
                self.bump();
                if !allow_void || depth > 0 {
                    return Err(SignatureError::VoidOutsideReturn { at });
                }
                TypeSig::Void
            }
            Some('L') => {
                self.bump();
                self.parse_reference(at)?
            }
            Some(code) => match Scalar::from_code(code) {
                Some(scalar) => {
                    self.bump();
                    TypeSig::Primitive(scalar)
                }
                None => return Err(SignatureError::UnknownCode { code, at }),
            },
        };

        if depth == 0 {
            Ok(leaf)
        } else {
            Ok(TypeSig::Array {
                element: Box::new(leaf),
                depth,
            })
        }
    }

    /// Parse the qualified name of a reference form, after the `L` marker.
    fn parse_reference(&mut self, start: usize) -> Result<TypeSig> {
        let mut name = String::new();
        loop {
            match self.bump() {
                Some(';') => break,
                Some(c) => name.push(c),
                None => return Err(SignatureError::UnterminatedReference { at: start }),
            }
        }
        if name.is_empty() {
            return Err(SignatureError::EmptyReference { at: start });
        }
        Ok(TypeSig::Reference(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_primitives() {
        assert_eq!(TypeSig::parse("I").unwrap(), TypeSig::Primitive(Scalar::Int));
        assert_eq!(
            TypeSig::parse("Z").unwrap(),
            TypeSig::Primitive(Scalar::Boolean)
        );
        assert_eq!(
            TypeSig::parse("J").unwrap(),
            TypeSig::Primitive(Scalar::Long)
        );
        assert_eq!(
            TypeSig::parse("D").unwrap(),
            TypeSig::Primitive(Scalar::Double)
        );
    }

    #[test]
    fn parse_reference() {
        assert_eq!(
            TypeSig::parse("Ldemo.Counter;").unwrap(),
            TypeSig::Reference("demo.Counter".to_string())
        );
    }

    #[test]
    fn parse_arrays() {
        assert_eq!(
            TypeSig::parse("[I").unwrap(),
            TypeSig::Array {
                element: Box::new(TypeSig::Primitive(Scalar::Int)),
                depth: 1,
            }
        );
        assert_eq!(
            TypeSig::parse("[[Llang.String;").unwrap(),
            TypeSig::Array {
                element: Box::new(TypeSig::Reference("lang.String".to_string())),
                depth: 2,
            }
        );
    }

    #[test]
    fn parse_method_signatures() {
        let sig = MethodSig::parse("(ILlang.Integer;D)F").unwrap();
        assert_eq!(sig.params.len(), 3);
        assert_eq!(sig.params[0], TypeSig::Primitive(Scalar::Int));
        assert_eq!(sig.params[1], TypeSig::Reference("lang.Integer".to_string()));
        assert_eq!(sig.params[2], TypeSig::Primitive(Scalar::Double));
        assert_eq!(sig.ret, TypeSig::Primitive(Scalar::Float));
    }

    #[test]
    fn parse_void_return() {
        let sig = MethodSig::parse("()V").unwrap();
        assert!(sig.params.is_empty());
        assert_eq!(sig.ret, TypeSig::Void);
    }

    #[test]
    fn void_rejected_outside_return() {
        assert!(matches!(
            TypeSig::parse("V"),
            Err(SignatureError::VoidOutsideReturn { .. })
        ));
        assert!(matches!(
            MethodSig::parse("(V)I"),
            Err(SignatureError::VoidOutsideReturn { .. })
        ));
        assert!(matches!(
            MethodSig::parse("()[V"),
            Err(SignatureError::VoidOutsideReturn { .. })
        ));
    }

    #[test]
    fn unknown_code() {
        assert!(matches!(
            TypeSig::parse("Q"),
            Err(SignatureError::UnknownCode { code: 'Q', at: 0 })
        ));
        assert!(matches!(
            MethodSig::parse("(IX)V"),
            Err(SignatureError::UnknownCode { code: 'X', at: 2 })
        ));
    }

    #[test]
    fn unterminated_reference() {
        assert!(matches!(
            TypeSig::parse("Ldemo.Counter"),
            Err(SignatureError::UnterminatedReference { .. })
        ));
    }

    #[test]
    fn unterminated_parameter_list() {
        assert!(matches!(
            MethodSig::parse("(II"),
            Err(SignatureError::UnterminatedParameterList)
        ));
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(TypeSig::parse(""), Err(SignatureError::Empty));
        assert_eq!(MethodSig::parse(""), Err(SignatureError::Empty));
    }

    #[test]
    fn trailing_input_rejected() {
        assert!(matches!(
            TypeSig::parse("II"),
            Err(SignatureError::Trailing { .. })
        ));
        assert!(matches!(
            MethodSig::parse("()VI"),
            Err(SignatureError::Trailing { .. })
        ));
    }

    #[test]
    fn truncated_array() {
        assert!(matches!(
            TypeSig::parse("[["),
            Err(SignatureError::Truncated { .. })
        ));
    }

    #[test]
    fn classifications() {
        assert!(TypeSig::parse("I").unwrap().is_primitive());
        assert!(TypeSig::parse("[I").unwrap().is_primitive());
        assert!(!TypeSig::parse("Ldemo.Counter;").unwrap().is_primitive());
        assert!(!TypeSig::parse("[Ldemo.Counter;").unwrap().is_primitive());

        assert!(!TypeSig::parse("I").unwrap().is_array());
        assert!(TypeSig::parse("[I").unwrap().is_array());
        assert_eq!(TypeSig::parse("[[[D").unwrap().depth(), 3);
    }

    #[test]
    fn display_round_trip() {
        for s in ["I", "[I", "[[Llang.String;", "Ldemo.Counter;"] {
            assert_eq!(TypeSig::parse(s).unwrap().to_string(), s);
        }
        for s in ["()V", "(ILlang.Integer;D)F", "([I[Ldemo.Counter;)Llang.String;"] {
            assert_eq!(MethodSig::parse(s).unwrap().to_string(), s);
        }
    }
}
