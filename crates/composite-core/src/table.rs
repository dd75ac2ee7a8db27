//! Field tables: the ordered per-field decode/encode behavior of a record.
//!
//! The codec addresses fields purely by position. A [`Table`] is built once
//! per record type from [`Composite::describe`] and never changes afterwards.

use std::collections::HashSet;
use std::fmt;

use crate::codec::{CompositeCodec, Target};
use crate::error::{CompositeError, FieldError, Result};
use crate::quote::{push_quote, QuoteLevel};
use crate::value::FieldValue;

/// Decode/encode capability for one field of record type `R`.
pub trait FieldDescriptor<R>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Writes the value of `elem` into this field of `record`. `None` is SQL
    /// NULL and must clear the field.
    fn scan(&self, record: &mut R, elem: Option<&[u8]>) -> std::result::Result<(), FieldError>;

    /// Appends this field's element text, escaped for `level`. Appends
    /// nothing for NULL.
    fn append(
        &self,
        out: &mut Vec<u8>,
        record: &R,
        level: QuoteLevel,
    ) -> std::result::Result<(), FieldError>;
}

/// A record type that can be written as a composite literal.
///
/// ```
/// use composite_core::{Composite, TableBuilder};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Composite for Point {
///     const NAME: &'static str = "point";
///
///     fn describe(table: &mut TableBuilder<Self>) {
///         table
///             .field("x", |p| &p.x, |p| &mut p.x)
///             .field("y", |p| &p.y, |p| &mut p.y);
///     }
/// }
///
/// let p: Point = composite_core::decode(b"(3,4)").unwrap();
/// assert_eq!((p.x, p.y), (3, 4));
/// ```
pub trait Composite: Default + Send + Sync + 'static {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Declares the fields, in composite order.
    fn describe(table: &mut TableBuilder<Self>);
}

/// Ordered, immutable field list for record type `R`.
pub struct Table<R> {
    name: &'static str,
    fields: Vec<Box<dyn FieldDescriptor<R>>>,
}

impl<R: Composite> Table<R> {
    /// Builds the table declared by `R`.
    pub fn derive() -> Result<Self> {
        let mut builder = TableBuilder::new(R::NAME);
        R::describe(&mut builder);
        builder.build()
    }
}

impl<R> Table<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Box<dyn FieldDescriptor<R>>] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&dyn FieldDescriptor<R>> {
        self.fields.get(index).map(|f| f.as_ref())
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Position of the field called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }
}

impl<R> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("fields", &self.field_names())
            .finish()
    }
}

impl<R> fmt::Display for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Collects field declarations for a [`Table`].
pub struct TableBuilder<R> {
    name: &'static str,
    fields: Vec<Box<dyn FieldDescriptor<R>>>,
}

impl<R: 'static> TableBuilder<R> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Declares a field converted by its [`FieldValue`] impl.
    pub fn field<V>(
        &mut self,
        name: &'static str,
        get: fn(&R) -> &V,
        get_mut: fn(&mut R) -> &mut V,
    ) -> &mut Self
    where
        V: FieldValue + 'static,
    {
        self.descriptor(ValueField { name, get, get_mut })
    }

    /// Declares a field holding another composite. NULL resets it to
    /// `N::default()`.
    pub fn composite<N: Composite>(
        &mut self,
        name: &'static str,
        get: fn(&R) -> &N,
        get_mut: fn(&mut R) -> &mut N,
    ) -> &mut Self {
        self.descriptor(NestedField {
            name,
            access: Nested::Value(get, get_mut),
            codec: CompositeCodec::new(),
        })
    }

    /// Declares a NULL-able field holding another composite.
    pub fn optional_composite<N: Composite>(
        &mut self,
        name: &'static str,
        get: fn(&R) -> &Option<N>,
        get_mut: fn(&mut R) -> &mut Option<N>,
    ) -> &mut Self {
        self.descriptor(NestedField {
            name,
            access: Nested::Optional(get, get_mut),
            codec: CompositeCodec::new(),
        })
    }

    /// Declares a field with a hand-written descriptor.
    pub fn descriptor(&mut self, field: impl FieldDescriptor<R> + 'static) -> &mut Self {
        self.fields.push(Box::new(field));
        self
    }

    /// Finishes the table. Field names must be unique.
    pub fn build(self) -> Result<Table<R>> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(CompositeError::Lookup {
                    type_name: self.name,
                    message: format!("field {:?} declared twice", field.name()),
                });
            }
        }
        Ok(Table {
            name: self.name,
            fields: self.fields,
        })
    }
}

struct ValueField<R, V> {
    name: &'static str,
    get: fn(&R) -> &V,
    get_mut: fn(&mut R) -> &mut V,
}

impl<R, V: FieldValue> FieldDescriptor<R> for ValueField<R, V> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn scan(&self, record: &mut R, elem: Option<&[u8]>) -> std::result::Result<(), FieldError> {
        (self.get_mut)(record).scan(elem)
    }

    fn append(
        &self,
        out: &mut Vec<u8>,
        record: &R,
        level: QuoteLevel,
    ) -> std::result::Result<(), FieldError> {
        (self.get)(record).append(out, level)
    }
}

enum Nested<R, N> {
    Value(fn(&R) -> &N, fn(&mut R) -> &mut N),
    Optional(fn(&R) -> &Option<N>, fn(&mut R) -> &mut Option<N>),
}

/// A composite inside a composite. Decoding recurses on the element bytes;
/// encoding writes the inner literal one quote level deeper.
struct NestedField<R, N> {
    name: &'static str,
    access: Nested<R, N>,
    codec: CompositeCodec<N>,
}

impl<R, N: Composite> FieldDescriptor<R> for NestedField<R, N> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn scan(&self, record: &mut R, elem: Option<&[u8]>) -> std::result::Result<(), FieldError> {
        let target = match &self.access {
            Nested::Value(_, get_mut) => Target::Value(get_mut(record)),
            Nested::Optional(_, get_mut) => Target::Optional(get_mut(record)),
        };
        Ok(self.codec.decode(target, elem)?)
    }

    fn append(
        &self,
        out: &mut Vec<u8>,
        record: &R,
        level: QuoteLevel,
    ) -> std::result::Result<(), FieldError> {
        let nested = match &self.access {
            Nested::Value(get, _) => Some(get(record)),
            Nested::Optional(get, _) => get(record).as_ref(),
        };
        let Some(nested) = nested else {
            return Ok(());
        };
        push_quote(out, level);
        self.codec.encode(out, nested, level.deeper())?;
        push_quote(out, level);
        Ok(())
    }
}
