#[derive(Debug, Clone, Copy)]
pub struct CParticle {
    /// Ticks left before the particle expires.
    pub ttl: u32,
}
