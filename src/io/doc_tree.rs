//! Document-tree bridge: converts between a [`ParameterIO`] and a
//! `serde_yaml::Value`, the textual surface format's in-memory shape.
//!
//! Every container carries an explicit tag (`!io`, `!list`, `!obj`) and
//! every leaf whose wire type isn't recoverable from a bare YAML scalar
//! carries its own tag (`!vec3`, `!str32`, `!u`, ...). Parameter names are
//! recovered through a [`NameResolver`]; a key that can't be recovered is
//! written as its raw CRC32 so the document stays round-trippable.

use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};

use crate::error::{AampError, Result};
use crate::names::NameResolver;
use crate::parameter::{Parameter, ParameterIO, ParameterList, ParameterObject};
use crate::types::{
    BufferBinary, BufferF32, BufferInt, BufferU32, Color, Crc32, Curve, CurveSegment, Quat, Vec2,
    Vec3, Vec4,
};

fn tagged(name: &str, value: Value) -> Value {
    Value::Tagged(Box::new(TaggedValue {
        tag: Tag::new(name),
        value,
    }))
}

fn sequence_f32(name: &str, values: &[f32]) -> Value {
    tagged(
        name,
        Value::Sequence(values.iter().map(|v| Value::from(*v as f64)).collect()),
    )
}

/// Build the full document tree for an archive, recovering names through
/// `resolver` as it walks the tree.
pub fn to_doc_tree(pio: &ParameterIO, resolver: &NameResolver) -> Value {
    let mut map = Mapping::new();
    map.insert(Value::from("version"), Value::from(pio.version));
    map.insert(Value::from("type"), Value::from(pio.data_type.clone()));
    let root_name = resolver.resolve(0, pio.root_crc32(), Crc32::new(0)).as_key();
    map.insert(Value::from(root_name), list_to_value(pio.root(), pio.root_crc32(), resolver));
    tagged("!io", Value::Mapping(map))
}

fn list_to_value(list: &ParameterList, own_crc32: Crc32, resolver: &NameResolver) -> Value {
    let mut objects = Mapping::new();
    for (idx, (crc, obj)) in list.objects().iter().enumerate() {
        let name = resolver.resolve(idx, *crc, own_crc32).as_key();
        objects.insert(Value::from(name), object_to_value(obj, *crc, resolver));
    }
    let mut lists = Mapping::new();
    for (idx, (crc, child)) in list.lists().iter().enumerate() {
        let name = resolver.resolve(idx, *crc, own_crc32).as_key();
        lists.insert(Value::from(name), list_to_value(child, *crc, resolver));
    }
    let mut map = Mapping::new();
    map.insert(Value::from("objects"), Value::Mapping(objects));
    map.insert(Value::from("lists"), Value::Mapping(lists));
    tagged("!list", Value::Mapping(map))
}

fn object_to_value(obj: &ParameterObject, own_crc32: Crc32, resolver: &NameResolver) -> Value {
    let mut map = Mapping::new();
    for (idx, (crc, param)) in obj.params().iter().enumerate() {
        let name = resolver.resolve(idx, *crc, own_crc32).as_key();
        map.insert(Value::from(name), parameter_to_value(param));
    }
    tagged("!obj", Value::Mapping(map))
}

fn parameter_to_value(param: &Parameter) -> Value {
    match param {
        Parameter::Bool(b) => Value::from(*b),
        Parameter::F32(f) => Value::from(*f as f64),
        Parameter::Int(i) => Value::from(*i),
        Parameter::Vec2(v) => sequence_f32("!vec2", &[v.x, v.y]),
        Parameter::Vec3(v) => sequence_f32("!vec3", &[v.x, v.y, v.z]),
        Parameter::Vec4(v) => sequence_f32("!vec4", &[v.x, v.y, v.z, v.w]),
        Parameter::Color(c) => sequence_f32("!color", &[c.r, c.g, c.b, c.a]),
        Parameter::Quat(q) => sequence_f32("!quat", &[q.a, q.b, q.c, q.d]),
        Parameter::String32(s) => tagged("!str32", Value::from(s.as_str())),
        Parameter::String64(s) => tagged("!str64", Value::from(s.as_str())),
        Parameter::String256(s) => tagged("!str256", Value::from(s.as_str())),
        Parameter::StringRef(s) => Value::from(s.clone()),
        Parameter::U32(u) => tagged("!u", Value::from(*u)),
        Parameter::Curve1(c) | Parameter::Curve2(c) | Parameter::Curve3(c) | Parameter::Curve4(c) => {
            let mut items = Vec::new();
            for seg in c.segments() {
                items.push(Value::from(seg.controls[0]));
                items.push(Value::from(seg.controls[1]));
                items.extend(seg.values.iter().map(|v| Value::from(*v as f64)));
            }
            tagged("!curve", Value::Sequence(items))
        }
        Parameter::BufferInt(b) => tagged("!buf_int", Value::Sequence(b.0.iter().map(|v| Value::from(*v)).collect())),
        Parameter::BufferF32(b) => tagged(
            "!buf_f32",
            Value::Sequence(b.0.iter().map(|v| Value::from(*v as f64)).collect()),
        ),
        Parameter::BufferU32(b) => tagged("!buf_u32", Value::Sequence(b.0.iter().map(|v| Value::from(*v)).collect())),
        Parameter::BufferBinary(b) => tagged("!buf_bin", Value::Sequence(b.0.iter().map(|v| Value::from(*v)).collect())),
    }
}

/// Parse a document tree back into a [`ParameterIO`].
pub fn from_doc_tree(value: &Value) -> Result<ParameterIO> {
    let map = tagged_mapping(value, "!io")?;
    let version = map
        .get(&Value::from("version"))
        .and_then(Value::as_u64)
        .ok_or_else(|| AampError::InvalidDocTree("!io node missing integer 'version'".to_string()))? as u32;
    let data_type = map
        .get(&Value::from("type"))
        .and_then(Value::as_str)
        .ok_or_else(|| AampError::InvalidDocTree("!io node missing string 'type'".to_string()))?
        .to_string();

    let version_key = Value::from("version");
    let type_key = Value::from("type");
    let (root_key, root_value) = map
        .iter()
        .find(|(k, _)| *k != &version_key && *k != &type_key)
        .ok_or_else(|| AampError::InvalidDocTree("!io node missing root list entry".to_string()))?;
    let root_crc32 = parse_key(root_key)?;
    let root = value_to_list(root_value)?;
    Ok(ParameterIO::with_root(data_type, version, root_crc32, root))
}

fn value_to_list(value: &Value) -> Result<ParameterList> {
    let map = tagged_mapping(value, "!list")?;
    let objects_map = map
        .get(&Value::from("objects"))
        .and_then(Value::as_mapping)
        .ok_or_else(|| AampError::InvalidDocTree("!list node missing 'objects'".to_string()))?;
    let lists_map = map
        .get(&Value::from("lists"))
        .and_then(Value::as_mapping)
        .ok_or_else(|| AampError::InvalidDocTree("!list node missing 'lists'".to_string()))?;

    let mut list = ParameterList::new(Crc32::default());
    for (k, v) in objects_map.iter() {
        list.objects_mut().insert(parse_key(k)?, value_to_object(v)?);
    }
    for (k, v) in lists_map.iter() {
        list.lists_mut().insert(parse_key(k)?, value_to_list(v)?);
    }
    Ok(list)
}

fn value_to_object(value: &Value) -> Result<ParameterObject> {
    let map = tagged_mapping(value, "!obj")?;
    let mut obj = ParameterObject::new(Crc32::default());
    for (k, v) in map.iter() {
        obj.params_mut().insert(parse_key(k)?, value_to_parameter(v)?);
    }
    Ok(obj)
}

fn value_to_parameter(value: &Value) -> Result<Parameter> {
    if let Value::Tagged(tagged) = value {
        let tag = tagged.tag.to_string();
        return match tag.as_str() {
            "!vec2" => {
                let f = sequence_floats(&tagged.value, 2)?;
                Ok(Parameter::Vec2(Vec2::new(f[0], f[1])))
            }
            "!vec3" => {
                let f = sequence_floats(&tagged.value, 3)?;
                Ok(Parameter::Vec3(Vec3::new(f[0], f[1], f[2])))
            }
            "!vec4" => {
                let f = sequence_floats(&tagged.value, 4)?;
                Ok(Parameter::Vec4(Vec4::new(f[0], f[1], f[2], f[3])))
            }
            "!color" => {
                let f = sequence_floats(&tagged.value, 4)?;
                Ok(Parameter::Color(Color::new(f[0], f[1], f[2], f[3])))
            }
            "!quat" => {
                let f = sequence_floats(&tagged.value, 4)?;
                Ok(Parameter::Quat(Quat::new(f[0], f[1], f[2], f[3])))
            }
            "!str32" => Ok(Parameter::String32(scalar_str(&tagged.value)?.to_string().into())),
            "!str64" => Ok(Parameter::String64(scalar_str(&tagged.value)?.to_string().into())),
            "!str256" => Ok(Parameter::String256(scalar_str(&tagged.value)?.to_string().into())),
            "!u" => Ok(Parameter::U32(
                tagged
                    .value
                    .as_u64()
                    .ok_or_else(|| AampError::InvalidDocTree("!u requires an integer scalar".to_string()))?
                    as u32,
            )),
            "!curve" => {
                let seq = tagged
                    .value
                    .as_sequence()
                    .ok_or_else(|| AampError::InvalidDocTree("!curve requires a sequence".to_string()))?;
                if seq.len() % 32 != 0 {
                    return Err(AampError::InvalidDocTree(
                        "!curve sequence length must be a multiple of 32 (2 controls + 30 values)".to_string(),
                    ));
                }
                let mut segments = Vec::new();
                for chunk in seq.chunks(32) {
                    let controls = [
                        chunk[0]
                            .as_u64()
                            .ok_or_else(|| AampError::InvalidDocTree("!curve control must be an integer".to_string()))?
                            as u32,
                        chunk[1]
                            .as_u64()
                            .ok_or_else(|| AampError::InvalidDocTree("!curve control must be an integer".to_string()))?
                            as u32,
                    ];
                    let mut values = [0.0f32; 30];
                    for (slot, v) in values.iter_mut().zip(&chunk[2..]) {
                        *slot = v
                            .as_f64()
                            .ok_or_else(|| AampError::InvalidDocTree("!curve value must be a number".to_string()))?
                            as f32;
                    }
                    segments.push(CurveSegment::new(controls, values));
                }
                let curve = Curve::new(segments);
                match curve.segments().len() {
                    1 => Ok(Parameter::Curve1(curve)),
                    2 => Ok(Parameter::Curve2(curve)),
                    3 => Ok(Parameter::Curve3(curve)),
                    4 => Ok(Parameter::Curve4(curve)),
                    n => Err(AampError::InvalidDocTree(format!("unsupported curve segment count {n}"))),
                }
            }
            "!buf_int" => Ok(Parameter::BufferInt(BufferInt(sequence_ints(&tagged.value)?))),
            "!buf_u32" => Ok(Parameter::BufferU32(BufferU32(
                sequence_ints(&tagged.value)?.into_iter().map(|v| v as u32).collect(),
            ))),
            "!buf_f32" => Ok(Parameter::BufferF32(BufferF32(sequence_floats_vec(&tagged.value)?))),
            "!buf_bin" => Ok(Parameter::BufferBinary(BufferBinary(
                sequence_ints(&tagged.value)?.into_iter().map(|v| v as u8).collect(),
            ))),
            other => Err(AampError::InvalidDocTree(format!("unknown tag {other}"))),
        };
    }

    match value {
        Value::Bool(b) => Ok(Parameter::Bool(*b)),
        Value::Number(n) if n.is_f64() => Ok(Parameter::F32(n.as_f64().unwrap() as f32)),
        Value::Number(n) => Ok(Parameter::Int(n.as_i64().unwrap_or(0) as i32)),
        Value::String(s) => Ok(Parameter::StringRef(s.clone())),
        other => Err(AampError::InvalidDocTree(format!("unsupported scalar node: {other:?}"))),
    }
}

fn tagged_mapping<'a>(value: &'a Value, expected_tag: &str) -> Result<&'a Mapping> {
    match value {
        Value::Tagged(t) if t.tag == Tag::new(expected_tag) => t
            .value
            .as_mapping()
            .ok_or_else(|| AampError::InvalidDocTree(format!("{expected_tag} node must be a mapping"))),
        Value::Tagged(t) => Err(AampError::InvalidDocTree(format!(
            "expected tag {expected_tag}, got {}",
            t.tag
        ))),
        _ => Err(AampError::InvalidDocTree(format!("expected tag {expected_tag}"))),
    }
}

fn parse_key(key: &Value) -> Result<Crc32> {
    match key {
        Value::Number(n) => Ok(Crc32::new(
            n.as_u64()
                .ok_or_else(|| AampError::InvalidDocTree("integer key out of range".to_string()))? as u32,
        )),
        Value::String(s) => Ok(Crc32::hash(s)),
        other => Err(AampError::InvalidDocTree(format!("invalid mapping key: {other:?}"))),
    }
}

fn scalar_str(value: &Value) -> Result<&str> {
    value
        .as_str()
        .ok_or_else(|| AampError::InvalidDocTree("expected a string scalar".to_string()))
}

fn sequence_floats(value: &Value, expected_len: usize) -> Result<Vec<f32>> {
    let seq = sequence_floats_vec(value)?;
    if seq.len() != expected_len {
        return Err(AampError::InvalidDocTree(format!(
            "expected {expected_len} elements, got {}",
            seq.len()
        )));
    }
    Ok(seq)
}

fn sequence_floats_vec(value: &Value) -> Result<Vec<f32>> {
    value
        .as_sequence()
        .ok_or_else(|| AampError::InvalidDocTree("expected a sequence".to_string()))?
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| AampError::InvalidDocTree("expected a numeric element".to_string()))
        })
        .collect()
}

fn sequence_ints(value: &Value) -> Result<Vec<i32>> {
    value
        .as_sequence()
        .ok_or_else(|| AampError::InvalidDocTree("expected a sequence".to_string()))?
        .iter()
        .map(|v| {
            v.as_i64()
                .map(|i| i as i32)
                .ok_or_else(|| AampError::InvalidDocTree("expected an integer element".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_roundtrip_bool_param() {
        let mut root = ParameterList::new(Crc32::new(0));
        let mut obj = ParameterObject::new(Crc32::hash("TestObj"));
        obj.set_param("Enabled", Parameter::Bool(true));
        root.set_object("TestObj", obj);
        let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);

        let seen = IndexMap::new();
        let resolver = NameResolver::new(&seen);
        let doc = to_doc_tree(&pio, &resolver);
        let back = from_doc_tree(&doc).unwrap();
        assert_eq!(
            back.object("TestObj").unwrap().param("Enabled"),
            Some(&Parameter::Bool(true))
        );
    }

    #[test]
    fn test_vec3_tag_roundtrip() {
        let mut root = ParameterList::new(Crc32::new(0));
        let mut obj = ParameterObject::new(Crc32::hash("Obj"));
        obj.set_param("Pos", Parameter::Vec3(Vec3::new(1.0, 2.0, 3.0)));
        root.set_object("Obj", obj);
        let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);

        let seen = IndexMap::new();
        let resolver = NameResolver::new(&seen);
        let doc = to_doc_tree(&pio, &resolver);
        let back = from_doc_tree(&doc).unwrap();
        assert_eq!(
            back.object("Obj").unwrap().param("Pos"),
            Some(&Parameter::Vec3(Vec3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn test_unrecovered_name_uses_raw_crc32_key() {
        let mut root = ParameterList::new(Crc32::new(0));
        let obj = ParameterObject::new(Crc32::new(0xDEAD_BEEF));
        root.objects_mut().insert(Crc32::new(0xDEAD_BEEF), obj);
        let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);

        let seen = IndexMap::new();
        let resolver = NameResolver::new(&seen);
        let doc = to_doc_tree(&pio, &resolver);
        let back = from_doc_tree(&doc).unwrap();
        assert!(back.root().objects().contains_key(&Crc32::new(0xDEAD_BEEF)));
    }
}
