//! Helpers that unwrap optional values and iterate collections.
//!
//! Both hand the body a binding and its type, so call sites read the same
//! whether the value is optional, repeated, or neither.

use crate::{error::Result, types::RustType, writer::Writer};

impl Writer {
    /// Run `body` on the present case of `value`.
    ///
    /// For `Option<T>`, emits `if let Some(inner_n) = &value { .. }` and calls
    /// `body` with `inner_n` and `T`. Any other type is always present, so
    /// `body` gets `value` and `ty` unchanged and no guard is written.
    ///
    /// ```
    /// use quire_codegen::{RustType, Writer};
    ///
    /// let mut w = Writer::fragment("crate");
    /// let ty = RustType::option(RustType::string());
    /// w.if_some("name", &ty, |w, name, _| {
    ///     w.line(&format!("println!(\"{{}}\", {name});"));
    ///     Ok(())
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     w.body(),
    ///     "if let Some(inner_1) = &name {\n    println!(\"{}\", inner_1);\n}\n"
    /// );
    /// ```
    pub fn if_some(
        &mut self,
        value: &str,
        ty: &RustType,
        body: impl FnOnce(&mut Writer, &str, &RustType) -> Result<()>,
    ) -> Result<&mut Self> {
        let RustType::Option(inner) = ty else {
            body(self, value, ty)?;
            return Ok(self);
        };
        let name = self.fresh_name("inner");
        self.block(&format!("if let Some({name}) = &{value}"), |w| {
            body(w, &name, &**inner)
        })
    }

    /// Run `body` once per element of `value`.
    ///
    /// Vectors, slices and sets bind `item_n` to each element. Maps bind
    /// `entry_n` to each `(key, value)` pair and report a tuple type. Optional
    /// collections are unwrapped with [`Writer::if_some`] first. Only one level
    /// is iterated; the element of a `Vec<Vec<T>>` is a `Vec<T>`. Anything else
    /// is passed to `body` once, as is.
    pub fn for_each(
        &mut self,
        value: &str,
        ty: &RustType,
        body: impl FnOnce(&mut Writer, &str, &RustType) -> Result<()>,
    ) -> Result<&mut Self> {
        match ty {
            RustType::Option(_) => self.if_some(value, ty, |w, inner, inner_ty| {
                w.for_each(inner, inner_ty, body)?;
                Ok(())
            }),
            RustType::Vec(element) | RustType::Slice(element) | RustType::HashSet(element) => {
                let name = self.fresh_name("item");
                self.block(&format!("for {name} in {value}.iter()"), |w| {
                    body(w, &name, &**element)
                })
            }
            RustType::HashMap(key, val) => {
                let name = self.fresh_name("entry");
                let entry = RustType::Tuple(vec![(**key).clone(), (**val).clone()]);
                self.block(&format!("for {name} in {value}.iter()"), |w| {
                    body(w, &name, &entry)
                })
            }
            _ => {
                body(self, value, ty)?;
                Ok(self)
            }
        }
    }
}
