use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StageError::structural("x")
            .to_string()
            .contains("structural error:")
    );
    assert!(
        StageError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(StageError::grab("x").to_string().contains("pointer grab error:"));
    assert!(StageError::content("x").to_string().contains("content error:"));
    assert!(
        StageError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StageError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn stale_actor_names_the_handle() {
    let id = ActorId {
        idx: 3,
        generation: 7,
    };
    assert_eq!(
        StageError::StaleActor(id).to_string(),
        "stale actor handle ActorId(3@gen7)"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StageError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
