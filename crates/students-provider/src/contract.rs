//! Names shared by the provider and its clients: authority, paths, table, columns

use students_query::{ResourceAddress, Result};
use students_routes::{ResourceTemplate, SchemaRegistry};

/// Authority every students address lives under
pub const CONTENT_AUTHORITY: &str = "com.example.lenovo.students_contenproviderfoundation";

/// Path of the students collection
pub const PATH_STUDENTS: &str = "students";

/// Backing table
pub const TABLE_NAME: &str = "student";

/// Control number, the identity column
pub const COLUMN_ID: &str = "num_control";
pub const COLUMN_NOMBRE: &str = "nombre";
pub const COLUMN_PUNTOS_EXTRA: &str = "puntos_extra";

/// Every column of the table, in declaration order
pub const ALL_COLUMNS: [&str; 3] = [COLUMN_ID, COLUMN_NOMBRE, COLUMN_PUNTOS_EXTRA];

/// Database file opened when no path is configured
pub const DEFAULT_DATABASE_NAME: &str = "StudentDB";

/// Address of the namespace root
pub fn base_content_uri() -> ResourceAddress {
    ResourceAddress::root(CONTENT_AUTHORITY)
}

/// Address of the whole students collection
pub fn content_uri() -> ResourceAddress {
    base_content_uri().with_segment(PATH_STUDENTS)
}

/// Address of one student by control number
pub fn build_students_uri_with_id(num_control: &str) -> ResourceAddress {
    content_uri().with_segment(num_control)
}

/// Collection and item templates for `authority`, in match order
pub fn students_templates(authority: &str) -> [ResourceTemplate; 2] {
    [
        ResourceTemplate::collection(authority, PATH_STUDENTS, TABLE_NAME, COLUMN_ID),
        ResourceTemplate::item(
            authority,
            &format!("{}/*", PATH_STUDENTS),
            TABLE_NAME,
            COLUMN_ID,
        ),
    ]
}

/// Registry holding exactly the students templates
pub fn schema_registry(authority: &str) -> Result<SchemaRegistry> {
    SchemaRegistry::with_templates(students_templates(authority))
}
