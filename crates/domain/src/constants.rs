//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Document collections
pub const COLLECTION_COMPANIES: &str = "companies";
pub const COLLECTION_TEAMS: &str = "teams";
pub const COLLECTION_SITES: &str = "sites";
pub const COLLECTION_WORKERS: &str = "workers";
pub const COLLECTION_DAILY_REPORTS: &str = "dailyReports";
pub const COLLECTION_ADVANCE_DEDUCTIONS: &str = "advanceDeductions";
pub const COLLECTION_TAX_INVOICES: &str = "taxInvoices";
pub const PAYROLL_CONFIG_KEY: &str = "settings/payroll_config";

// Master-data change notification
pub const EVENT_MASTER_DATA_CHANGED: &str = "smart-construction:master-data-changed";
pub const EVENT_BUS_CAPACITY: usize = 64;

// Registration
pub const DEFAULT_CONSTRUCTION_COMPANY_NAME: &str = "청연";
pub const DEFAULT_TEAM_SUFFIX: &str = " 팀";

// Allocator board
pub const BOARD_COLUMN_COUNT: usize = 4;
pub const DEFAULT_MAN_DAY: f64 = 1.0;
pub const MAX_MAN_DAY: f64 = 3.0;

// Worker pay
pub const MAX_UNIT_PRICE: i64 = 100_000_000;

// Integrity
pub const DEFAULT_INTEGRITY_BATCH_SIZE: usize = 500;

// Tax / invoicing
pub const VAT_RATE_PERCENT: i64 = 10;
pub const INVOICE_DATE_FORMAT: &str = "%Y%m%d";
pub const DEFAULT_INVOICE_TIMEOUT_SECS: u64 = 30;

// Export
pub const TAX_OFFICE_SHEET_TITLE: &str = "세무서 제출자료";
pub const TAX_OFFICE_FILE_PREFIX: &str = "세무서제출자료";
pub const TAX_OFFICE_HEADERS: [&str; 4] = ["번호", "이름", "주민등록번호", "본봉"];

// Localized operator messages
pub const MSG_SAVE_FAILED: &str = "저장 중 오류가 발생했습니다";
pub const MSG_LOAD_FAILED: &str = "데이터를 불러오는 중 오류가 발생했습니다";
pub const MSG_VERIFY_FAILED: &str = "설정이 서버에 반영되지 않았습니다. 권한 설정을 확인해주세요";
pub const MSG_UNIT_PRICE_TOO_LARGE: &str = "단가는 1억원 이하여야 합니다";
