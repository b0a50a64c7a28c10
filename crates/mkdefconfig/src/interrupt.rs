use std::sync::atomic::{AtomicUsize, Ordering};

/// Exit code of a run interrupted outside the overwrite prompt (128 + SIGINT).
pub const INTERRUPTED: i32 = 130;

static PENDING_PROMPTS: AtomicUsize = AtomicUsize::new(0);

/// Marks a confirmation prompt as waiting for input until dropped.
pub(crate) struct PendingPrompt(());

impl PendingPrompt {
    pub(crate) fn start() -> Self {
        PENDING_PROMPTS.fetch_add(1, Ordering::SeqCst);
        Self(())
    }
}

impl Drop for PendingPrompt {
    fn drop(&mut self) {
        PENDING_PROMPTS.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn prompt_pending() -> bool {
    PENDING_PROMPTS.load(Ordering::SeqCst) > 0
}

/// Ctrl-C at the overwrite prompt means "never mind" and exits cleanly.
pub fn exit_code(prompt_pending: bool) -> i32 {
    if prompt_pending { 0 } else { INTERRUPTED }
}

/// Installs the Ctrl-C handler for the whole run.
pub fn install() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        let pending = prompt_pending();
        if pending {
            println!();
        }
        std::process::exit(exit_code(pending));
    })
}
