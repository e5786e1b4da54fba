//! # Test-Key Content
//!
//! The specification's test key always answers with fresh content so client
//! authors have something stable to integrate against. We keep a small
//! stash of public-domain lines about spring — on brand — and serve one at
//! random, already wrapped as board-shaped HTML.

use rand::seq::SliceRandom;

/// Quotes served for test-key requests. All public domain.
const QUOTES: &[&str] = &[
    "<p>A little madness in the Spring / Is wholesome even for the King.</p>\n\n<p>\u{2014} Emily Dickinson</p>",
    "<p>It was one of those March days when the sun shines hot and the wind blows cold: when it is summer in the light, and winter in the shade.</p>\n\n<p>\u{2014} Charles Dickens</p>",
    "<p>Spring is the time of plans and projects.</p>\n\n<p>\u{2014} Leo Tolstoy</p>",
    "<p>Nothing is so beautiful as Spring \u{2014} / When weeds, in wheels, shoot long and lovely and lush.</p>\n\n<p>\u{2014} Gerard Manley Hopkins</p>",
    "<p>I am going to try to pay attention to the spring. I am going to look around at all the flowers, and look up at the hectic trees.</p>\n\n<p>\u{2014} Anne Lamott</p>",
    "<p>Whan that Aprille with his shoures soote / The droghte of March hath perced to the roote.</p>\n\n<p>\u{2014} Geoffrey Chaucer</p>",
    "<p>The year's at the spring / And day's at the morn.</p>\n\n<p>\u{2014} Robert Browning</p>",
    "<p>In the spring, at the end of the day, you should smell like dirt.</p>\n\n<p>\u{2014} Margaret Atwood</p>",
];

/// One quote, chosen fresh per call.
pub fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::thread_rng())
        .expect("quote list is non-empty")
}
