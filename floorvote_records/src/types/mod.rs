mod bill;
pub use self::bill::{Bill, BillId, TopicCodes};

mod debate;
pub use self::debate::{Debate, Turn};

mod legislator;
pub use self::legislator::{Chamber, Legislator, LegislatorID, Party, PersonName, Scores};

mod roll;
pub use self::roll::{Roll, Tally, Vote, CATEGORY_PASSAGE, RESULT_BILL_PASSED};
