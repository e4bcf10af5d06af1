pub mod ms {
    pub const POLL_INTERVAL: u64 = 100;
    pub const PAGE_DELAY: u64 = 1000;
    pub const TAB_OPEN_SETTLE: u64 = 200;
    pub const BROWSER_STARTUP: u64 = 1000;
}

pub mod secs {
    pub const ELEMENT_WAIT: u64 = 10;
    pub const NAVIGATION: u64 = 30;
    pub const REQUEST: u64 = 30;
}
