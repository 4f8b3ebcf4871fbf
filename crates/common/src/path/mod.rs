pub mod object;

pub use object::{
    is_reserved, scrum_dir, scrum_object, validate_component, validate_username, PathError,
    RESERVED_NAMES, SCRUM_DATE_LAYOUT, SCRUM_ROOT,
};
