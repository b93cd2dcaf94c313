//! Binary round-trip tests covering the format's concrete seed scenarios:
//! the smallest valid archive, a single boolean parameter, string
//! deduplication, name recovery via the parent container, an unknown hash
//! preserved verbatim, and a length-prefixed buffer.

use aamp::io::reader::decode;
use aamp::io::writer::write;
use aamp::{Crc32, Parameter, ParameterIO, ParameterList, ParameterObject};

fn empty_archive() -> ParameterIO {
    ParameterIO::with_root("xml", 0, Crc32::new(0), ParameterList::new(Crc32::new(0)))
}

#[test]
fn smallest_valid_archive_roundtrips() {
    let bytes = write(&empty_archive()).unwrap();
    let pio = decode(&bytes).unwrap();
    assert_eq!(pio.data_type, "xml");
    assert_eq!(pio.version, 0);
    assert!(pio.root().objects().is_empty());
    assert!(pio.root().lists().is_empty());
}

#[test]
fn single_bool_parameter_roundtrips() {
    let mut root = ParameterList::new(Crc32::new(0));
    let mut obj = ParameterObject::new(Crc32::hash("Settings"));
    obj.set_param("IsActive", Parameter::Bool(true));
    root.set_object("Settings", obj);
    let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);

    let bytes = write(&pio).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(
        decoded.object("Settings").unwrap().param("IsActive"),
        Some(&Parameter::Bool(true))
    );
}

#[test]
fn duplicate_strings_are_deduplicated_in_the_string_pool() {
    let mut root = ParameterList::new(Crc32::new(0));
    for name in ["First", "Second", "Third"] {
        let mut obj = ParameterObject::new(Crc32::hash(name));
        obj.set_param("Label", Parameter::StringRef("shared label".to_string()));
        root.set_object(name, obj);
    }
    let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);
    let bytes = write(&pio).unwrap();

    let needle = b"shared label\0";
    let occurrences = bytes.windows(needle.len()).filter(|w| *w == needle).count();
    assert_eq!(occurrences, 1);

    let decoded = decode(&bytes).unwrap();
    for name in ["First", "Second", "Third"] {
        assert_eq!(
            decoded.object(name).unwrap().param("Label"),
            Some(&Parameter::StringRef("shared label".to_string()))
        );
    }
}

#[test]
fn unknown_hash_is_preserved_through_a_roundtrip() {
    let mut root = ParameterList::new(Crc32::new(0));
    let unknown = Crc32::new(0x1234_5678);
    root.objects_mut().insert(unknown, ParameterObject::new(unknown));
    let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);

    let bytes = write(&pio).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert!(decoded.root().objects().contains_key(&unknown));
}

#[test]
fn buffer_with_length_prefix_roundtrips() {
    use aamp::types::BufferInt;
    let mut root = ParameterList::new(Crc32::new(0));
    let mut obj = ParameterObject::new(Crc32::hash("Data"));
    obj.set_param("Indices", Parameter::BufferInt(BufferInt(vec![10, -5, 0, 99])));
    root.set_object("Data", obj);
    let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);

    let bytes = write(&pio).unwrap();
    let decoded = decode(&bytes).unwrap();
    match decoded.object("Data").unwrap().param("Indices").unwrap() {
        Parameter::BufferInt(b) => assert_eq!(b.0, vec![10, -5, 0, 99]),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn nested_lists_and_objects_roundtrip() {
    let mut leaf_obj = ParameterObject::new(Crc32::hash("Leaf"));
    leaf_obj.set_param("Depth", Parameter::Int(2));
    let mut inner_list = ParameterList::new(Crc32::hash("Inner"));
    inner_list.set_object("Leaf", leaf_obj);

    let mut root = ParameterList::new(Crc32::new(0));
    root.set_list("Inner", inner_list);
    let pio = ParameterIO::with_root("xml", 0, Crc32::new(0), root);

    let bytes = write(&pio).unwrap();
    let decoded = decode(&bytes).unwrap();
    let inner = decoded.list("Inner").unwrap();
    assert_eq!(inner.object("Leaf").unwrap().param("Depth"), Some(&Parameter::Int(2)));
}

#[test]
fn nonzero_format_version_survives_a_roundtrip() {
    let pio = ParameterIO::with_root("xml", 7, Crc32::new(0), ParameterList::new(Crc32::new(0)));
    let bytes = write(&pio).unwrap();
    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.version, 7);
}

#[test]
fn truncated_input_is_rejected() {
    let bytes = write(&empty_archive()).unwrap();
    let truncated = &bytes[..bytes.len() - 4];
    assert!(decode(truncated).is_err());
}
