//! C-layout variable tables exported by native extension libraries.
//!
//! An extension exports an array of [`RawVariableDescriptor`] terminated by
//! an entry whose name is null or empty. Field meaning depends on the tag:
//!
//! | tag      | `value`                         | `integer` |
//! |----------|---------------------------------|-----------|
//! | Null     | ignored                         | ignored   |
//! | Integer  | ignored                         | the value |
//! | String   | NUL-terminated string           | ignored   |
//! | Dict     | ignored                         | ignored   |
//! | List     | ignored                         | ignored   |
//! | Function | a [`NativeFn`] entry point      | arity     |
//! | Object   | NUL-terminated constructor name | ignored   |
//! | Data     | opaque pointer                  | ignored   |
//!
//! `NativeFn` uses the Rust ABI, so extensions that export functions must be
//! built with the same compiler as the host.
//!
//! A table that breaks these rules is a defect in the extension, not a
//! runtime condition: reading it panics.

use std::ffi::{c_char, c_void, CStr};

use tether_common::{NativeFn, OpaqueData, TypeTag};

use crate::declare::{Binding, VariableDescriptor};

/// One entry of an extension's variable table.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawVariableDescriptor {
    /// NUL-terminated UTF-8 name; null or empty ends the table.
    pub name: *const c_char,
    /// A [`TypeTag`] discriminant.
    pub type_tag: u32,
    /// Tag-dependent pointer.
    pub value: *const c_void,
    /// Tag-dependent integer.
    pub integer: i64,
}

// SAFETY: descriptors are immutable data read once at initialization; the
// pointers they carry are never written through by this crate.
unsafe impl Sync for RawVariableDescriptor {}

impl RawVariableDescriptor {
    /// The end-of-table marker.
    pub const SENTINEL: Self = Self {
        name: std::ptr::null(),
        type_tag: TypeTag::Invalid as u32,
        value: std::ptr::null(),
        integer: 0,
    };

    /// An entry with no pointer payload.
    pub fn scalar(name: &'static CStr, tag: TypeTag, integer: i64) -> Self {
        Self {
            name: name.as_ptr(),
            type_tag: tag as u32,
            value: std::ptr::null(),
            integer,
        }
    }

    /// A string or object-constructor entry.
    pub fn text(name: &'static CStr, tag: TypeTag, text: &'static CStr) -> Self {
        Self {
            name: name.as_ptr(),
            type_tag: tag as u32,
            value: text.as_ptr().cast(),
            integer: 0,
        }
    }

    /// A native function entry.
    pub fn function(name: &'static CStr, entry: NativeFn, arity: u8) -> Self {
        Self {
            name: name.as_ptr(),
            type_tag: TypeTag::Function as u32,
            value: entry as *const c_void,
            integer: i64::from(arity),
        }
    }

    /// An opaque data entry.
    pub fn data(name: &'static CStr, data: OpaqueData) -> Self {
        Self {
            name: name.as_ptr(),
            type_tag: TypeTag::Data as u32,
            value: data.as_ptr().cast_const(),
            integer: 0,
        }
    }
}

/// Reads a sentinel-terminated table into descriptors.
///
/// # Safety
///
/// `table` must point to a readable array of descriptors ending with a
/// sentinel, and every pointer in it must stay valid for `'a`.
///
/// # Panics
///
/// Panics if an entry is malformed: a tag that is out of range or
/// `Invalid`, a name that is not UTF-8, a null string or constructor
/// pointer, a null function, or an arity that does not fit in a `u8`.
pub unsafe fn read_table<'a>(table: *const RawVariableDescriptor) -> Vec<VariableDescriptor<'a>> {
    let mut descriptors = Vec::new();
    let mut cursor = table;
    loop {
        // SAFETY: the caller guarantees entries up to the sentinel are readable.
        let raw = unsafe { &*cursor };
        if raw.name.is_null() {
            break;
        }
        // SAFETY: non-null names are NUL-terminated and live for 'a.
        let name: &'a CStr = unsafe { CStr::from_ptr(raw.name) };
        if name.to_bytes().is_empty() {
            break;
        }
        let name = name
            .to_str()
            .unwrap_or_else(|_| malformed(&name.to_string_lossy(), "name is not UTF-8"));
        // SAFETY: forwarded from the caller.
        descriptors.push(unsafe { to_descriptor(raw, name) });
        // SAFETY: this entry was not the sentinel, so another follows.
        cursor = unsafe { cursor.add(1) };
    }
    descriptors
}

unsafe fn to_descriptor<'a>(raw: &RawVariableDescriptor, name: &'a str) -> VariableDescriptor<'a> {
    let tag = TypeTag::try_from(raw.type_tag)
        .unwrap_or_else(|e| malformed(name, &e.to_string()));

    let binding = match tag {
        TypeTag::Invalid => malformed(name, "type tag is INVALID"),
        TypeTag::Null => Binding::Null,
        TypeTag::Integer => Binding::Integer(raw.integer),
        TypeTag::String => {
            // SAFETY: string payloads are NUL-terminated and live for 'a.
            let payload: &'a CStr = unsafe { text(raw, name) };
            Binding::String(payload.to_bytes())
        }
        TypeTag::Dict => Binding::Dict,
        TypeTag::List => Binding::List,
        TypeTag::Function => {
            if raw.value.is_null() {
                malformed(name, "function entry point is null");
            }
            let arity = u8::try_from(raw.integer)
                .unwrap_or_else(|_| malformed(name, &format!("arity {} out of range", raw.integer)));
            // SAFETY: the table format says a function value is a NativeFn;
            // both are pointer-sized and the pointer is non-null.
            let entry = unsafe { std::mem::transmute::<*const c_void, NativeFn>(raw.value) };
            Binding::Function { entry, arity }
        }
        TypeTag::Object => {
            // SAFETY: as for strings.
            let payload: &'a CStr = unsafe { text(raw, name) };
            let constructor = payload
                .to_str()
                .unwrap_or_else(|_| malformed(name, "constructor name is not UTF-8"));
            Binding::Object { constructor }
        }
        TypeTag::Data => Binding::Data(OpaqueData::new(raw.value.cast_mut())),
    };

    VariableDescriptor { name, binding }
}

unsafe fn text<'a>(raw: &RawVariableDescriptor, name: &str) -> &'a CStr {
    if raw.value.is_null() {
        malformed(name, "text value is null");
    }
    // SAFETY: checked non-null; the caller vouches for termination and lifetime.
    unsafe { CStr::from_ptr(raw.value.cast()) }
}

fn malformed(name: &str, reason: &str) -> ! {
    panic!("malformed variable descriptor '{name}': {reason}");
}
