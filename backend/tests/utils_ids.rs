use tutorhub_backend::utils::ids::next_in_sequence;

#[test]
fn public_id_sequences_per_prefix() {
    assert_eq!(next_in_sequence("EM", None), "EM001");
    assert_eq!(next_in_sequence("EM", Some("EM001")), "EM002");
    assert_eq!(next_in_sequence("STU", Some("STU009")), "STU010");
    assert_eq!(next_in_sequence("ROOM", Some("ROOM099")), "ROOM100");
    assert_eq!(next_in_sequence("ISS", Some("ISS120")), "ISS121");
}

#[test]
fn sequence_survives_the_padding_boundary() {
    assert_eq!(next_in_sequence("STU", Some("STU999")), "STU1000");
    assert_eq!(next_in_sequence("STU", Some("STU1000")), "STU1001");
}
