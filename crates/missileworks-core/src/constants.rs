//! Flight-model constants and tuning parameters.

use crate::types::ModelId;

/// Driver tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Milliseconds per tick at the nominal rate.
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

// --- Barometric model ---

/// Standard gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.806_65;

/// Molar mass of dry air (kg/mol).
pub const AIR_MOLAR_MASS: f32 = 0.028_964_4;

/// Universal gas constant (J/(mol·K)).
pub const GAS_CONSTANT: f32 = 8.314_459_8;

/// Standard temperature at sea level (K).
pub const STANDARD_TEMPERATURE: f32 = 288.15;

// --- Drag / steering ---

/// Peak drag coefficient. Negative: drag acts against the forward vector.
pub const MAX_DRAG_COEFFICIENT: f32 = -0.5;

/// Lateral lever arm of the steering force, in body-local meters.
pub const DRAG_OFFSET: f32 = 0.5;

// --- Models ---

/// Default projectile body (large rocket prop).
pub const DEFAULT_MODEL: ModelId = ModelId(737_852_268);

/// Small rocket used by guided projectiles and cluster sub-munitions.
pub const SMALL_ROCKET_MODEL: ModelId = ModelId(-1_146_260_322);

// --- Base lifecycle ---

/// Default age bound before a projectile self-destructs (ms).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default max speed (m/s).
pub const DEFAULT_MAX_CRUISE_SPEED: f32 = 50.0;

/// Default boost-stage max speed (m/s).
pub const DEFAULT_MAX_BOOST_SPEED: f32 = 100.0;

/// Default explosion damage multiplier.
pub const DEFAULT_EXPLOSION_DAMAGE_SCALE: f32 = 1.0;

/// Default explosion camera shake.
pub const DEFAULT_EXPLOSION_CAMERA_SHAKE: f32 = 2.0;

/// Default particle-effect scale.
pub const DEFAULT_EFFECT_SCALE: f32 = 2.0;

// --- Guided ---

/// Guided projectile age bound (ms).
pub const GUIDED_TIMEOUT_MS: u64 = 20_000;

/// Guided forward thrust per tick.
pub const GUIDED_THRUST: f32 = 1.0;

/// Guided spawn point relative to the operator when none is given.
pub const GUIDED_SPAWN_OFFSET: [f32; 3] = [0.0, 1.0, 1.5];

/// Grace window before a motionless guided body counts as a collision (ms).
pub const GUIDED_STATIONARY_GRACE_MS: u64 = 1_000;

/// Offset of the exhaust effect along the forward vector.
pub const GUIDED_EFFECT_FORWARD_OFFSET: f32 = 0.25;

// --- Staged ---

/// Height above the operator a staged projectile spawns at (m).
pub const STAGED_SPAWN_HEIGHT: f32 = 200.0;

/// Horizontal halo radius around the operator for staged spawns (m).
pub const STAGED_HALO_RADIUS: f32 = 5.0;

/// Staged projectile age bound (ms).
pub const STAGED_TIMEOUT_MS: u64 = 15_000;

/// Staged constant cruise thrust per tick.
pub const STAGED_THRUST: f32 = 100.0;

/// Duration of the autopilot launch stage (ms).
pub const STAGED_LAUNCH_STAGE_MS: u64 = 1_500;

/// Extra grace on top of the launch stage before "motionless" counts (ms).
pub const STAGED_STATIONARY_MARGIN_MS: u64 = 500;

/// Presentation fade duration around the camera hand-off (ms).
pub const STAGED_FADE_MS: u64 = 250;

/// Operator corrective force per unit of axis deflection.
pub const STAGED_CORRECTION_FORCE: f32 = 20.0;

/// Radius of the per-tick target scan (m).
pub const STAGED_SCAN_RADIUS: f32 = 120.0;

/// Max secondary explosions per payload release.
pub const STAGED_MAX_PAYLOADS: usize = 8;

/// Field of view for projectile cameras (degrees).
pub const CAMERA_FOV: f32 = 60.0;

/// Tracking shot position relative to the spawn point.
pub const TRACKING_CAMERA_OFFSET: [f32; 3] = [0.0, -15.0, 10.0];

/// Body-mounted camera offset (body-local).
pub const MOUNTED_CAMERA_OFFSET: [f32; 3] = [0.0, 1.0, 0.0];

// --- Relationship groups ---

/// Groups the operator's group is set to hate by default.
pub const DEFAULT_HATE_GROUPS: [u32; 16] = [
    0xA49E_591C, // cops
    0xF50B_51B7, // security
    0x4325_F88A,
    0x11DE_95FC,
    0x8DC3_0DC3, // gangs
    0x90C7_DA60,
    0x11A9_A7E3,
    0x4589_7C40,
    0xC26D_562A,
    0x7972_FFBD,
    0x783E_3868,
    0x936E_7EFB,
    0x6A3B_9F86,
    0xB359_8E9C, // ambient gangs
    0x7EA2_6372, // prisoners
    0x8296_713E, // dealers
];
