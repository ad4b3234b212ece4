//! Constants for the D-Day backend

/// Category label for personal records (the default category)
pub const CATEGORY_PERSONAL: &str = "개인";

/// Category label for study/academic records
pub const CATEGORY_STUDY: &str = "학업";

/// Category label for work records
pub const CATEGORY_WORK: &str = "업무";

/// Category label for everything else
pub const CATEGORY_OTHER: &str = "기타";

/// Page used when the request omits one or sends garbage
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the request omits one or sends garbage
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound for a requested page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Wire format of a target date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite://dday.db?mode=rwc";
