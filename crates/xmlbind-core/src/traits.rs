//! The `Bind` trait and the tree traversal it drives.

use tracing::trace;

use crate::{BindError, Binding, BindingCache, Element, FieldValue, Schema};

/// A type with a statically declared markup binding.
///
/// Usually derived with `#[derive(Bind)]`. Hand-written impls declare the
/// schema and move each declared field through the writer and reader:
///
/// ```
/// use xmlbind_core::{Bind, BindError, FieldReader, FieldSchema, FieldWriter, Schema};
///
/// struct Image {
///     id: String,
///     arch: Option<String>,
/// }
///
/// impl Bind for Image {
///     fn schema() -> Schema {
///         Schema::new("Image", "image")
///             .field(FieldSchema::attribute::<String>("id").required())
///             .field(FieldSchema::element::<Option<String>>("arch"))
///     }
///
///     fn write_fields(&self, out: &mut FieldWriter<'_>) -> Result<(), BindError> {
///         out.write("id", &self.id)?;
///         out.write("arch", &self.arch)
///     }
///
///     fn read_fields(input: &FieldReader<'_>) -> Result<Self, BindError> {
///         Ok(Self {
///             id: input.read("id")?,
///             arch: input.read("arch")?,
///         })
///     }
/// }
/// ```
pub trait Bind: Sized + 'static {
    /// Declare how the type maps to markup.
    fn schema() -> Schema;

    /// Write every bound field.
    fn write_fields(&self, out: &mut FieldWriter<'_>) -> Result<(), BindError>;

    /// Construct a value from the bound fields.
    fn read_fields(input: &FieldReader<'_>) -> Result<Self, BindError>;
}

/// Writes fields of one value into its element.
pub struct FieldWriter<'a> {
    binding: &'a Binding,
    element: &'a mut Element,
    bindings: &'a BindingCache,
}

impl<'a> FieldWriter<'a> {
    pub fn new(binding: &'a Binding, element: &'a mut Element, bindings: &'a BindingCache) -> Self {
        Self {
            binding,
            element,
            bindings,
        }
    }

    /// Write the field declared under the Rust identifier `field`.
    pub fn write<V: FieldValue>(&mut self, field: &str, value: &V) -> Result<(), BindError> {
        let schema = self.binding.field(field)?;
        value.write_field(schema, self.element, self.bindings)
    }

    /// The binding of the value being written.
    pub fn binding(&self) -> &Binding {
        self.binding
    }
}

/// Reads fields of one value from its element.
pub struct FieldReader<'a> {
    binding: &'a Binding,
    element: &'a Element,
    bindings: &'a BindingCache,
}

impl<'a> FieldReader<'a> {
    pub fn new(binding: &'a Binding, element: &'a Element, bindings: &'a BindingCache) -> Self {
        Self {
            binding,
            element,
            bindings,
        }
    }

    /// Read the field declared under the Rust identifier `field`.
    pub fn read<V: FieldValue>(&self, field: &str) -> Result<V, BindError> {
        let schema = self.binding.field(field)?;
        V::read_field(schema, self.element, self.bindings)
    }

    /// The binding of the value being read.
    pub fn binding(&self) -> &Binding {
        self.binding
    }

    /// The element being read.
    pub fn element(&self) -> &Element {
        self.element
    }
}

/// Build an element named `name` holding `value`'s fields.
pub fn to_element<T: Bind>(
    value: &T,
    name: &str,
    bindings: &BindingCache,
) -> Result<Element, BindError> {
    let binding = bindings.resolve::<T>()?;
    let mut element = Element::new(name);
    write_into(value, &binding, &mut element, bindings)?;
    Ok(element)
}

/// Build the root element of a document holding `value`.
pub fn to_document<T: Bind>(value: &T, bindings: &BindingCache) -> Result<Element, BindError> {
    let binding = bindings.resolve::<T>()?;
    let mut root = Element::new(binding.root());
    if let Some(namespace) = binding.namespace() {
        root.set_attribute("xmlns", namespace);
    }
    write_into(value, &binding, &mut root, bindings)?;
    Ok(root)
}

fn write_into<T: Bind>(
    value: &T,
    binding: &Binding,
    element: &mut Element,
    bindings: &BindingCache,
) -> Result<(), BindError> {
    let mut writer = FieldWriter::new(binding, element, bindings);
    value.write_fields(&mut writer)
}

/// Construct a value from an element's fields, ignoring unbound markup.
pub fn from_element<T: Bind>(element: &Element, bindings: &BindingCache) -> Result<T, BindError> {
    let binding = bindings.resolve::<T>()?;
    trace_unbound(&binding, element);
    T::read_fields(&FieldReader::new(&binding, element, bindings))
}

/// Construct a value from a document's root element.
pub fn from_document<T: Bind>(root: &Element, bindings: &BindingCache) -> Result<T, BindError> {
    let binding = bindings.resolve::<T>()?;
    if root.name != binding.root() {
        return Err(BindError::UnexpectedRoot {
            expected: binding.root(),
            found: root.name.clone(),
        });
    }
    from_element(root, bindings)
}

fn trace_unbound(binding: &Binding, element: &Element) {
    for attr in &element.attributes {
        if !binding.binds_attribute(&attr.name) {
            trace!(
                type_name = binding.type_name(),
                attribute = %attr.name,
                "ignoring unbound attribute"
            );
        }
    }
    for child in element.elements() {
        if !binding.binds_element(&child.name) {
            trace!(
                type_name = binding.type_name(),
                element = %child.name,
                "ignoring unbound element"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldSchema, Item, Kind, Occurs, Source, nested, read_one};

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Credentials {
        user: String,
        key: Option<String>,
    }

    impl Bind for Credentials {
        fn schema() -> Schema {
            Schema::new("Credentials", "credentials")
                .field(FieldSchema::attribute::<String>("user").required())
                .field(FieldSchema::element::<Option<String>>("key"))
        }

        fn write_fields(&self, out: &mut FieldWriter<'_>) -> Result<(), BindError> {
            out.write("user", &self.user)?;
            out.write("key", &self.key)
        }

        fn read_fields(input: &FieldReader<'_>) -> Result<Self, BindError> {
            Ok(Self {
                user: input.read("user")?,
                key: input.read("key")?,
            })
        }
    }

    impl Item for Credentials {
        const KIND: Kind = Kind::Nested;

        fn write_item(
            &self,
            field: &FieldSchema,
            parent: &mut Element,
            bindings: &BindingCache,
        ) -> Result<(), BindError> {
            nested::write_item(self, field, parent, bindings)
        }

        fn read_item(
            field: &FieldSchema,
            parent: &Element,
            source: Source<'_>,
            bindings: &BindingCache,
        ) -> Result<Self, BindError> {
            nested::read_item(field, parent, source, bindings)
        }

        fn absent(field: &FieldSchema, bindings: &BindingCache) -> Result<Self, BindError> {
            nested::absent(field, bindings)
        }
    }

    impl FieldValue for Credentials {
        const KIND: Kind = Kind::Nested;
        const OCCURS: Occurs = Occurs::One;

        fn write_field(
            &self,
            field: &FieldSchema,
            parent: &mut Element,
            bindings: &BindingCache,
        ) -> Result<(), BindError> {
            self.write_item(field, parent, bindings)
        }

        fn read_field(
            field: &FieldSchema,
            parent: &Element,
            bindings: &BindingCache,
        ) -> Result<Self, BindError> {
            read_one(field, parent, bindings)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Server {
        name: String,
        login: Credentials,
        backups: Vec<Credentials>,
    }

    impl Bind for Server {
        fn schema() -> Schema {
            Schema::new("Server", "server")
                .namespace("urn:example:server")
                .field(FieldSchema::element::<String>("name"))
                .field(FieldSchema::element::<Credentials>("login"))
                .field(FieldSchema::element::<Vec<Credentials>>("backups").rename("backup"))
        }

        fn write_fields(&self, out: &mut FieldWriter<'_>) -> Result<(), BindError> {
            out.write("name", &self.name)?;
            out.write("login", &self.login)?;
            out.write("backups", &self.backups)
        }

        fn read_fields(input: &FieldReader<'_>) -> Result<Self, BindError> {
            Ok(Self {
                name: input.read("name")?,
                login: input.read("login")?,
                backups: input.read("backups")?,
            })
        }
    }

    fn server() -> Server {
        Server {
            name: "web-1".into(),
            login: Credentials {
                user: "root".into(),
                key: Some("id_rsa".into()),
            },
            backups: vec![
                Credentials {
                    user: "ops".into(),
                    key: None,
                },
                Credentials {
                    user: "audit".into(),
                    key: Some("audit.pem".into()),
                },
            ],
        }
    }

    #[test]
    fn test_document_shape() {
        let bindings = BindingCache::new();
        let root = to_document(&server(), &bindings).unwrap();

        assert_eq!(root.name, "server");
        assert_eq!(root.attribute("xmlns"), Some("urn:example:server"));
        let login = root.first_element("login").unwrap();
        assert_eq!(login.attribute("user"), Some("root"));
        assert_eq!(login.first_element("key").unwrap().text_content(), "id_rsa");
        assert_eq!(root.elements_named("backup").count(), 2);
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_tree_roundtrip() {
        let bindings = BindingCache::new();
        let root = to_document(&server(), &bindings).unwrap();
        let back: Server = from_document(&root, &bindings).unwrap();
        assert_eq!(back, server());
    }

    #[test]
    fn test_unexpected_root() {
        let bindings = BindingCache::new();
        let err = from_document::<Server>(&Element::new("client"), &bindings).unwrap_err();
        assert!(matches!(
            err,
            BindError::UnexpectedRoot { expected: "server", ref found } if found == "client"
        ));
    }

    #[test]
    fn test_lenient_reading() {
        let bindings = BindingCache::new();
        let root = Element::new("server")
            .attr("extra", "ignored")
            .child(Element::new("unknown").text("ignored"))
            .child(Element::new("name").text("db-1"));

        let server: Server = from_document(&root, &bindings).unwrap();
        assert_eq!(server.name, "db-1");
        assert_eq!(server.login, Credentials::default());
        assert!(server.backups.is_empty());
    }

    #[test]
    fn test_nested_outside_element() {
        let bindings = BindingCache::new();
        let field = FieldSchema::attribute::<Credentials>("login");
        let parent = Element::new("server").attr("login", "root");
        let err = <Credentials as FieldValue>::read_field(&field, &parent, &bindings).unwrap_err();
        assert!(matches!(err, BindError::Placement { ref path } if path == "server@login"));
    }

    #[test]
    fn test_undeclared_field() {
        struct Sloppy;

        impl Bind for Sloppy {
            fn schema() -> Schema {
                Schema::new("Sloppy", "sloppy").field(FieldSchema::element::<String>("a"))
            }

            fn write_fields(&self, out: &mut FieldWriter<'_>) -> Result<(), BindError> {
                out.write("b", &"oops".to_string())
            }

            fn read_fields(input: &FieldReader<'_>) -> Result<Self, BindError> {
                let _: String = input.read("b")?;
                Ok(Sloppy)
            }
        }

        let bindings = BindingCache::new();
        assert!(matches!(
            to_document(&Sloppy, &bindings),
            Err(BindError::UnknownField { type_name: "Sloppy", .. })
        ));
        assert!(matches!(
            from_document::<Sloppy>(&Element::new("sloppy"), &bindings),
            Err(BindError::UnknownField { .. })
        ));
    }
}
