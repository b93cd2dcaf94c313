//! The parameter tree data model: typed leaf values plus the three
//! container kinds (list, object, root) that hold them.

use indexmap::IndexMap;

use crate::types::{
    BufferBinary, BufferF32, BufferInt, BufferU32, Color, Crc32, Curve, Quat, String256, String32,
    String64, Vec2, Vec3, Vec4,
};

/// A single AAMP parameter value: a tagged union over the 21 wire variants.
///
/// Variants whose payload coincides with a plain Rust primitive (`Int` vs
/// `U32`, `StringRef` vs `String32`/`String64`/`String256`) are still kept
/// distinct, since which wire type produced a value is semantically
/// meaningful even when the bits are identical.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Bool(bool),
    F32(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Color(Color),
    String32(String32),
    String64(String64),
    Curve1(Curve),
    Curve2(Curve),
    Curve3(Curve),
    Curve4(Curve),
    BufferInt(BufferInt),
    BufferF32(BufferF32),
    String256(String256),
    Quat(Quat),
    U32(u32),
    BufferU32(BufferU32),
    BufferBinary(BufferBinary),
    StringRef(String),
}

impl Parameter {
    /// The wire type tag (0-20) for this variant.
    pub fn type_tag(&self) -> u8 {
        match self {
            Parameter::Bool(_) => 0,
            Parameter::F32(_) => 1,
            Parameter::Int(_) => 2,
            Parameter::Vec2(_) => 3,
            Parameter::Vec3(_) => 4,
            Parameter::Vec4(_) => 5,
            Parameter::Color(_) => 6,
            Parameter::String32(_) => 7,
            Parameter::String64(_) => 8,
            Parameter::Curve1(_) => 9,
            Parameter::Curve2(_) => 10,
            Parameter::Curve3(_) => 11,
            Parameter::Curve4(_) => 12,
            Parameter::BufferInt(_) => 13,
            Parameter::BufferF32(_) => 14,
            Parameter::String256(_) => 15,
            Parameter::Quat(_) => 16,
            Parameter::U32(_) => 17,
            Parameter::BufferU32(_) => 18,
            Parameter::BufferBinary(_) => 19,
            Parameter::StringRef(_) => 20,
        }
    }

    /// True for the four string-bearing variants, which live in the
    /// string section rather than the data section.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Parameter::String32(_)
                | Parameter::String64(_)
                | Parameter::String256(_)
                | Parameter::StringRef(_)
        )
    }

    /// True for the four variable-length buffer variants.
    pub fn is_buffer(&self) -> bool {
        matches!(
            self,
            Parameter::BufferInt(_)
                | Parameter::BufferF32(_)
                | Parameter::BufferU32(_)
                | Parameter::BufferBinary(_)
        )
    }
}

/// An insertion-ordered mapping `CRC32 -> Parameter`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterObject {
    crc32: Crc32,
    params: IndexMap<Crc32, Parameter>,
}

impl ParameterObject {
    pub fn new(crc32: Crc32) -> Self {
        ParameterObject {
            crc32,
            params: IndexMap::new(),
        }
    }

    /// The CRC32 this object is referenced by in its parent, or `Crc32(0)`
    /// for a freshly constructed, unattached object.
    pub fn crc32(&self) -> Crc32 {
        self.crc32
    }

    /// Look up a parameter by name, hashing it to a CRC32 first.
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.get(&Crc32::hash(name))
    }

    /// Insert or overwrite a parameter by name.
    pub fn set_param(&mut self, name: &str, value: Parameter) {
        self.params.insert(Crc32::hash(name), value);
    }

    pub fn params(&self) -> &IndexMap<Crc32, Parameter> {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut IndexMap<Crc32, Parameter> {
        &mut self.params
    }
}

/// An insertion-ordered pair of mappings: child lists and child objects,
/// each keyed by CRC32.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterList {
    crc32: Crc32,
    lists: IndexMap<Crc32, ParameterList>,
    objects: IndexMap<Crc32, ParameterObject>,
}

impl ParameterList {
    pub fn new(crc32: Crc32) -> Self {
        ParameterList {
            crc32,
            lists: IndexMap::new(),
            objects: IndexMap::new(),
        }
    }

    pub fn crc32(&self) -> Crc32 {
        self.crc32
    }

    pub fn list(&self, name: &str) -> Option<&ParameterList> {
        self.lists.get(&Crc32::hash(name))
    }

    pub fn object(&self, name: &str) -> Option<&ParameterObject> {
        self.objects.get(&Crc32::hash(name))
    }

    pub fn set_list(&mut self, name: &str, list: ParameterList) {
        self.lists.insert(Crc32::hash(name), list);
    }

    pub fn set_object(&mut self, name: &str, object: ParameterObject) {
        self.objects.insert(Crc32::hash(name), object);
    }

    pub fn lists(&self) -> &IndexMap<Crc32, ParameterList> {
        &self.lists
    }

    pub fn lists_mut(&mut self) -> &mut IndexMap<Crc32, ParameterList> {
        &mut self.lists
    }

    pub fn objects(&self) -> &IndexMap<Crc32, ParameterObject> {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut IndexMap<Crc32, ParameterObject> {
        &mut self.objects
    }
}

/// The root of a parameter archive: a single root list plus a `type`
/// string and a format `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterIO {
    pub version: u32,
    pub data_type: String,
    root_crc32: Crc32,
    root: ParameterList,
}

impl ParameterIO {
    pub fn new(data_type: impl Into<String>, version: u32) -> Self {
        ParameterIO {
            version,
            data_type: data_type.into(),
            root_crc32: Crc32::default(),
            root: ParameterList::default(),
        }
    }

    pub fn with_root(data_type: impl Into<String>, version: u32, root_crc32: Crc32, root: ParameterList) -> Self {
        ParameterIO {
            version,
            data_type: data_type.into(),
            root_crc32,
            root,
        }
    }

    /// The CRC32 key of the single top-level root list.
    pub fn root_crc32(&self) -> Crc32 {
        self.root_crc32
    }

    pub fn root(&self) -> &ParameterList {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut ParameterList {
        &mut self.root
    }

    pub fn list(&self, name: &str) -> Option<&ParameterList> {
        self.root.list(name)
    }

    pub fn object(&self, name: &str) -> Option<&ParameterObject> {
        self.root.object(name)
    }
}
