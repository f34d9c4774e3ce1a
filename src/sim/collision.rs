//! Collision resolution between the player box and static platforms
//!
//! The default resolver is velocity-sign driven: whichever way the player is
//! moving decides which edge it gets snapped to. It does not look at
//! penetration depth, so a box sinking into a floor while tumbling also gets
//! a horizontal correction. `MinimumPenetration` is the opt-in alternative
//! that resolves each overlap along its shallower axis only.

use serde::{Deserialize, Serialize};

use super::platform::PlatformRegistry;
use super::rect::Rect;
use super::state::Player;

/// How overlaps are turned into corrections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionMode {
    /// Both axes corrected for every intersecting platform, chosen by the
    /// sign of the velocity on that axis
    #[default]
    SignDriven,
    /// One axis per intersecting platform, the one with the smaller overlap
    MinimumPenetration,
}

impl CollisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionMode::SignDriven => "sign-driven",
            CollisionMode::MinimumPenetration => "minimum-penetration",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sign-driven" | "sign" | "classic" => Some(CollisionMode::SignDriven),
            "minimum-penetration" | "min-penetration" | "mtv" => {
                Some(CollisionMode::MinimumPenetration)
            }
            _ => None,
        }
    }
}

/// Result of a collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Landed on (or is resting on) a platform top this pass
    pub on_ground: bool,
    /// A horizontal correction stopped the player
    pub blocked: bool,
    /// The horizontal correction cut an in-progress tumble short
    pub interrupted: bool,
    /// Number of platforms that intersected
    pub hits: u32,
}

/// Reconcile the player's integrated position against every platform
///
/// Platforms are visited in registry order. Each correction zeroes the
/// velocity that drove it, so later platforms only get to correct an axis
/// whose velocity is still non-zero.
pub fn resolve(
    player: &mut Player,
    platforms: &PlatformRegistry,
    mode: CollisionMode,
) -> Contact {
    match mode {
        CollisionMode::SignDriven => resolve_sign_driven(player, platforms),
        CollisionMode::MinimumPenetration => resolve_min_penetration(player, platforms),
    }
}

fn resolve_sign_driven(player: &mut Player, platforms: &PlatformRegistry) -> Contact {
    let mut contact = Contact::default();
    // Intersections are tested against where the player ended up after
    // integration, not against the partially corrected box.
    let bounds = player.bounds();

    for platform in platforms {
        let rect = platform.rect();
        if !bounds.intersects(&rect) {
            continue;
        }
        contact.hits += 1;

        if player.vel.y > 0.0 {
            land_on(player, &rect, &mut contact);
        } else if player.vel.y < 0.0 {
            bump_head(player, &rect);
        }

        if player.vel.x > 0.0 {
            player.pos.x = rect.left() - player.size.x;
            block(player, &mut contact);
        } else if player.vel.x < 0.0 {
            player.pos.x = rect.right();
            block(player, &mut contact);
        }
    }

    contact
}

fn resolve_min_penetration(player: &mut Player, platforms: &PlatformRegistry) -> Contact {
    let mut contact = Contact::default();

    for platform in platforms {
        let rect = platform.rect();
        let bounds = player.bounds();
        let Some(depth) = bounds.penetration(&rect) else {
            continue;
        };
        contact.hits += 1;

        if depth.y <= depth.x {
            let falling = if player.vel.y != 0.0 {
                player.vel.y > 0.0
            } else {
                bounds.center().y < rect.center().y
            };
            if falling {
                land_on(player, &rect, &mut contact);
            } else {
                bump_head(player, &rect);
            }
        } else {
            let push_left = bounds.right() - rect.left();
            let push_right = rect.right() - bounds.left();
            if push_left <= push_right {
                player.pos.x = rect.left() - player.size.x;
                if player.vel.x > 0.0 {
                    block(player, &mut contact);
                }
            } else {
                player.pos.x = rect.right();
                if player.vel.x < 0.0 {
                    block(player, &mut contact);
                }
            }
        }
    }

    contact
}

/// Snap bottom edge to the platform top
fn land_on(player: &mut Player, rect: &Rect, contact: &mut Contact) {
    player.pos.y = rect.top() - player.size.y;
    player.vel.y = 0.0;
    contact.on_ground = true;
}

/// Snap top edge to the platform bottom
fn bump_head(player: &mut Player, rect: &Rect) {
    player.pos.y = rect.bottom();
    player.vel.y = 0.0;
}

fn block(player: &mut Player, contact: &mut Contact) {
    contact.blocked = true;
    if player.interrupt_rotation() {
        contact.interrupted = true;
    }
}
