use tracegraph::hashing;
use tracegraph::Shape;

#[test]
fn fnv1a_matches_the_reference_vectors() {
    assert_eq!(hashing::fnv1a_hash(b""), 0xcbf29ce484222325);
    assert_eq!(hashing::fnv1a_hash(b"a"), 0xaf63dc4c8601ec8c);
}

#[test]
fn combine_is_order_sensitive() {
    let lhs = hashing::fingerprint_str("graph::add");
    let rhs = hashing::fingerprint_str("graph::mul");

    assert_eq!(hashing::combine(lhs, rhs), hashing::combine(lhs, rhs));
    assert_ne!(
        hashing::combine(lhs, rhs),
        hashing::combine(rhs, lhs),
        "operand position must stay part of the digest"
    );
}

#[test]
fn serializable_fingerprints_follow_value_equality() {
    let square = Shape::new([8, 8]);
    let same = Shape::new([8, 8]);
    let wide = Shape::new([8, 16]);

    let a = hashing::fingerprint_serializable(&square).expect("shape serializes");
    let b = hashing::fingerprint_serializable(&same).expect("shape serializes");
    let c = hashing::fingerprint_serializable(&wide).expect("shape serializes");

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn primitive_fingerprints_are_stable_across_calls() {
    assert_eq!(
        hashing::fingerprint_str("scope"),
        hashing::fnv1a_hash(b"scope")
    );
    assert_eq!(
        hashing::fingerprint_usize(7),
        hashing::fingerprint_usize(7)
    );
    assert_ne!(hashing::fingerprint_usize(7), hashing::fingerprint_usize(8));
}
