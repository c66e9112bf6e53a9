use tutorhub_backend::utils::jwt::{
    create_access_token, create_refresh_token, hash_reset_token, verify_token, TOKEN_TYPE_ACCESS,
    TOKEN_TYPE_REFRESH,
};

#[test]
fn access_token_round_trip_carries_role_claims() {
    let token = create_access_token(
        "acc-1".into(),
        "EM007".into(),
        "Learning Advisor".into(),
        "secret",
        24,
    )
    .expect("create token");

    let claims = verify_token(&token, "secret", TOKEN_TYPE_ACCESS).expect("verify token");
    assert_eq!(claims.sub, "acc-1");
    assert_eq!(claims.employee_id, "EM007");
    assert_eq!(claims.role, "Learning Advisor");
    assert_eq!(claims.token_type, "access");
}

#[test]
fn token_types_do_not_cross_over() {
    let access = create_access_token(
        "acc-1".into(),
        "EM007".into(),
        "Teacher".into(),
        "secret",
        24,
    )
    .unwrap();
    let refresh = create_refresh_token(
        "acc-1".into(),
        "EM007".into(),
        "Teacher".into(),
        "secret",
        7,
    )
    .unwrap();

    assert!(verify_token(&access, "secret", TOKEN_TYPE_REFRESH).is_err());
    assert!(verify_token(&refresh, "secret", TOKEN_TYPE_ACCESS).is_err());
}

#[test]
fn each_token_gets_a_fresh_jti() {
    let a = create_access_token("a".into(), "e".into(), "Teacher".into(), "secret", 1).unwrap();
    let b = create_access_token("a".into(), "e".into(), "Teacher".into(), "secret", 1).unwrap();
    let claims_a = verify_token(&a, "secret", TOKEN_TYPE_ACCESS).unwrap();
    let claims_b = verify_token(&b, "secret", TOKEN_TYPE_ACCESS).unwrap();
    assert_ne!(claims_a.jti, claims_b.jti);
}

#[test]
fn reset_token_hashing_is_deterministic() {
    assert_eq!(hash_reset_token("abc"), hash_reset_token("abc"));
    assert_ne!(hash_reset_token("abc"), hash_reset_token("abd"));
}
