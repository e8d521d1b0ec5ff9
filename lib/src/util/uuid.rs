/// Random (v4) UUID, used for group identifiers and key package ids.
#[inline]
pub fn generate_uuid() -> uuid::Uuid {
    uuid::Uuid::new_v4()
}
