use tabweave_types::GroupColor;

use crate::world::WorldBuilder;

/// Two real groups plus a few ungrouped tabs; the canonical focus/session
/// fixture.
pub fn research_window() -> WorldBuilder {
    WorldBuilder::new()
        .group(
            "papers",
            GroupColor::Blue,
            &[
                "https://arxiv.example.org/abs/1",
                "https://arxiv.example.org/abs/2",
            ],
        )
        .group(
            "docs",
            GroupColor::Green,
            &["https://docs.example.com/guide"],
        )
        .tab("https://scratch.example.net/notes")
        .active_tab("https://search.example.com/?q=rust")
}

/// Ungrouped tabs across several origins, with a pinned one; the
/// canonical clustering/suspension fixture.
pub fn mixed_window() -> WorldBuilder {
    WorldBuilder::new()
        .pinned_tab("https://mail.example.com/inbox")
        .tab("https://shop.example.com/cart")
        .tab("https://shop.example.com/item/1")
        .tab("https://shop.example.com/item/2")
        .tab("https://news.example.org/today")
        .tab("https://news.example.org/archive")
}
