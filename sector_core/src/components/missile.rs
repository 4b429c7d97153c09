#[derive(Debug, Clone, Copy)]
pub struct CMissile {
    /// The thing that fired it. Never hit by its own missile.
    pub owner: Option<hecs::Entity>,
    pub damage: i32,
}
