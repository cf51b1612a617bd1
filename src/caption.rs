use crate::{
    foundation::core::UserSelection,
    session::notify::Notification,
};

pub const CAPTION_COPIED: &str = "Caption copied to clipboard! 📋";
pub const CAPTION_COPIED_MS: u64 = 2000;

/// Share caption for a finished picture, personalised with the name and status label.
pub fn caption_for(selection: &UserSelection) -> String {
    format!(
        "Initializing… ⚙️💻🔧\n\n\
         I'm {name}, a {status} Bachelor of Science in Information Technology student at \
         Polytechnic University of the Philippines – San Pedro Campus. Here at PUP, we're more \
         than just students—we're builders, problem-solvers, and visionaries shaping tomorrow's \
         digital world.\n\n\
         This year, let's write better code, craft smarter solutions, and chase bigger dreams. \
         Together, we'll take on challenges, spark innovation, and push the limits of what's \
         possible.\n\n\
         Frame: Jhayciel Santiago\n\
         Caption: Jenmarc Ronquillo",
        name = selection.name.trim(),
        status = selection.status.label(),
    )
}

/// Notification shown once the caption is on the clipboard.
pub fn caption_copied() -> Notification {
    Notification::success(CAPTION_COPIED, CAPTION_COPIED_MS)
}

#[cfg(test)]
#[path = "../tests/unit/caption.rs"]
mod tests;
