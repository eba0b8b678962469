//! Core Data attribute type mapping

/// Attribute type tag of a Core Data model, as far as serialization cares.
/// Only the integer widths change the emitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    Integer16,
    Integer32,
    Integer64,
    /// Any other tag (including a missing one), kept verbatim
    Other(String),
}

impl AttributeKind {
    /// Resolve a raw `attributeType` tag
    pub fn resolve(tag: &str) -> Self {
        match tag.trim() {
            "Integer 16" => AttributeKind::Integer16,
            "Integer 32" => AttributeKind::Integer32,
            "Integer 64" => AttributeKind::Integer64,
            other => AttributeKind::Other(other.to_string()),
        }
    }

    /// Whether values of this kind need an explicit `Int(..)` conversion on
    /// export (`Int16`/`Int32`/`Int64` on the managed object, `Int` on the
    /// plain object)
    pub fn is_integer(&self) -> bool {
        match self {
            AttributeKind::Integer16 | AttributeKind::Integer32 | AttributeKind::Integer64 => true,
            AttributeKind::Other(tag) => tag.contains("Integer"),
        }
    }

    /// Wrap an expression in the export-side conversion for this kind
    pub fn export_expression(&self, expr: &str) -> String {
        if self.is_integer() {
            format!("Int({})", expr)
        } else {
            expr.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_tags() {
        assert_eq!(AttributeKind::resolve("Integer 16"), AttributeKind::Integer16);
        assert_eq!(AttributeKind::resolve(" Integer 32 "), AttributeKind::Integer32);
        assert_eq!(AttributeKind::resolve("Integer 64"), AttributeKind::Integer64);
        assert_eq!(
            AttributeKind::resolve("String"),
            AttributeKind::Other("String".to_string())
        );
        assert_eq!(AttributeKind::resolve(""), AttributeKind::Other(String::new()));
    }

    #[test]
    fn test_is_integer() {
        assert!(AttributeKind::resolve("Integer 16").is_integer());
        assert!(AttributeKind::resolve("Integer 32").is_integer());
        assert!(AttributeKind::resolve("Integer 64").is_integer());
        assert!(AttributeKind::resolve("Integer 8").is_integer());
        assert!(!AttributeKind::resolve("Decimal").is_integer());
        assert!(!AttributeKind::resolve("Double").is_integer());
        assert!(!AttributeKind::resolve("String").is_integer());
        assert!(!AttributeKind::resolve("").is_integer());
    }

    #[test]
    fn test_export_expression() {
        assert_eq!(AttributeKind::Integer32.export_expression("age"), "Int(age)");
        assert_eq!(
            AttributeKind::resolve("String").export_expression("name"),
            "name"
        );
    }
}
