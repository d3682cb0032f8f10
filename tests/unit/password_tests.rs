use miniblog_backend_lib::auth::CredentialVerifier;

fn verifier() -> CredentialVerifier {
    CredentialVerifier::with_cost(8, 8, 1).unwrap()
}

#[test]
fn test_password_hashing_and_verification() {
    let verifier = verifier();
    let hash = verifier.hash("SecureP@ssw0rd").unwrap();

    assert!(hash.starts_with("$scrypt$"));
    assert!(!hash.contains("SecureP@ssw0rd"));
    assert!(verifier.verify("SecureP@ssw0rd", &hash));
    assert!(!verifier.verify("SecureP@ssw0rD", &hash));
}

#[test]
fn test_same_password_different_salts() {
    let verifier = verifier();
    let first = verifier.hash("secret1").unwrap();
    let second = verifier.hash("secret1").unwrap();

    assert_ne!(first, second);
    assert!(verifier.verify("secret1", &first));
    assert!(verifier.verify("secret1", &second));
}

#[test]
fn test_hash_verifies_under_other_cost() {
    // Parameters travel inside the stored string
    let hash = verifier().hash("secret1").unwrap();
    let stronger = CredentialVerifier::with_cost(10, 8, 1).unwrap();
    assert!(stronger.verify("secret1", &hash));
}

#[test]
fn test_garbage_hash_never_verifies() {
    let verifier = verifier();
    assert!(!verifier.verify("secret1", ""));
    assert!(!verifier.verify("secret1", "secret1"));
    assert!(!verifier.verify("secret1", "$scrypt$ln=8,r=8,p=1$bm90LWJhc2U2NA$"));
}
