pub mod logo;
pub mod naming;
pub mod record;

pub use logo::{LogoImage, ResolvedLogo, is_remote_hint};
pub use naming::{AGENDA_SUFFIX, agenda_file_name, attachment_file_name};
pub use record::{AgendaItem, AgendaRecord, Attendee};
