//! One resolution function per supported game system.
//!
//! | System | Function | Dice |
//! |---|---|---|
//! | Old World of Darkness | [`owod`] | d10 pool vs. difficulty |
//! | New World of Darkness | [`nwod`] | d10 pool, 8+ succeeds, 10-again |
//! | Exalted | [`exalted`] | d10 pool, 7+ succeeds, 10s count double |
//! | Buffy the Vampire Slayer | [`btvs`] | d10 + skill through the step table |
//! | All Flesh Must Be Eaten | [`allflesh`] | as BTVS, with rolls of luck |
//! | Qin | [`qin`] | yin d10 vs. yang d10 |
//! | Orkworld | [`orkworld`] | d6 pool grouped by face |
//! | Wushu | [`wushu`] | d6 pool under trait |
//! | Alternity | [`alternity`] | d20 plus situation die |
//! | In Nomine | [`in_nomine`] | 2d6 vs. skill, d6 check |
//! | Pendragon | [`pendragon`] | d20 vs. skill |
//! | Shadowrun | [`shadowrun`] | d6 pool, 5+ hits |
//! | Heaven & Earth | [`heaven_earth`] | d10 pool with rerolls |
//! | Legend of the Five Rings | [`l5r`] | roll-and-keep d10s |

mod d10;
mod d20;
mod d6;
mod step;
mod wod;

pub use d10::{HeavenEarthRoll, L5rRoll, QinRoll, heaven_earth, l5r, qin};
pub use d20::{
    AlternityOutcome, AlternityRoll, PendragonOutcome, PendragonRoll, alternity, pendragon,
};
pub use d6::{
    InNomineOutcome, InNomineRoll, OrkRoll, ShadowrunOutcome, ShadowrunRoll, WushuRoll,
    in_nomine, orkworld, shadowrun, wushu,
};
pub(crate) use d6::score_shadowrun;
pub use step::{StepRoll, allflesh, btvs, step_value};
pub use wod::{
    ExaltedOutcome, ExaltedRoll, NwodOutcome, NwodRoll, OwodOutcome, OwodRoll, exalted, nwod,
    owod,
};

/// Counts the faces in `dice` that satisfy `pred`.
pub(crate) fn count(dice: &[u32], pred: impl Fn(u32) -> bool) -> u32 {
    dice.iter().filter(|&&d| pred(d)).count() as u32
}
