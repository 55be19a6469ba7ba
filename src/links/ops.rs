//! Operation names used by the broker's link maps.

// API root
pub const LIST_DOMAINS: &str = "LIST_DOMAINS";
pub const ADD_DOMAIN: &str = "ADD_DOMAIN";

// Any resource
pub const GET: &str = "GET";
pub const UPDATE: &str = "UPDATE";
pub const DELETE: &str = "DELETE";

// Domain
pub const LIST_APPLICATIONS: &str = "LIST_APPLICATIONS";
pub const ADD_APPLICATION: &str = "ADD_APPLICATION";

// Application lifecycle events
pub const START: &str = "START";
pub const STOP: &str = "STOP";
pub const FORCE_STOP: &str = "FORCE_STOP";
pub const RESTART: &str = "RESTART";
pub const SCALE_UP: &str = "SCALE_UP";
pub const SCALE_DOWN: &str = "SCALE_DOWN";

// Application sub-resources
pub const LIST_CARTRIDGES: &str = "LIST_CARTRIDGES";
pub const ADD_CARTRIDGE: &str = "ADD_CARTRIDGE";
pub const LIST_ENVIRONMENT_VARIABLES: &str = "LIST_ENVIRONMENT_VARIABLES";
pub const ADD_ENVIRONMENT_VARIABLE: &str = "ADD_ENVIRONMENT_VARIABLE";
pub const SET_UNSET_ENVIRONMENT_VARIABLES: &str = "SET_UNSET_ENVIRONMENT_VARIABLES";
pub const LIST_ALIASES: &str = "LIST_ALIASES";
pub const ADD_ALIAS: &str = "ADD_ALIAS";
pub const GET_GEAR_GROUPS: &str = "GET_GEAR_GROUPS";
