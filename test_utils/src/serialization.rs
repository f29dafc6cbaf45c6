/// Round trips through JSON and returns the serialized string. The calling crate needs `serde_json`.
#[macro_export]
macro_rules! test_serialization {
    ($obj_type:ty, $obj: expr) => {{
        let ser = serde_json::to_string(&$obj).unwrap();
        let deser = serde_json::from_str::<$obj_type>(&ser).unwrap();
        assert_eq!($obj, deser);
        ser
    }};
}

/// Round trips through the compressed and uncompressed canonical encodings
#[macro_export]
macro_rules! test_canonical_serialization {
    ($obj_type:ty, $obj: expr) => {
        let mut serz = vec![];
        CanonicalSerialize::serialize_compressed(&$obj, &mut serz).unwrap();
        let deserz: $obj_type = CanonicalDeserialize::deserialize_compressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);

        let mut serz = vec![];
        $obj.serialize_uncompressed(&mut serz).unwrap();
        let deserz: $obj_type = CanonicalDeserialize::deserialize_uncompressed(&serz[..]).unwrap();
        assert_eq!(deserz, $obj);
    };
}
