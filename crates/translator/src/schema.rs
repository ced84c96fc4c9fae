//! Schema context store: the single source of schema truth for generation.
//!
//! Holds the entity types, the query/mutation catalog with required-field
//! lists, the extraction rules, and the worked examples. Everything here is
//! `'static` data; [`SchemaDescriptor::context_text`] renders it once into
//! the text embedded verbatim at the top of every generation prompt.
//!
//! Changing the GraphQL catalog means editing this file and bumping
//! [`SCHEMA_VERSION`].

use std::fmt::Write as _;
use std::sync::OnceLock;

/// Version of the operation catalog described here.
pub const SCHEMA_VERSION: &str = "2025.2";

/// Placeholder the backend emits for the requesting user's id. The calling
/// application substitutes it before executing the operation.
pub const CURRENT_USER_PLACEHOLDER: &str = "CURRENT_USER";

/// An entity type and the fields a generated selection set may request.
#[derive(Debug, Clone, Copy)]
pub struct EntityType {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

/// One entry in the operation catalog.
#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub kind: OperationKind,
    pub name: &'static str,
    /// Argument list as written in the GraphQL signature, without parentheses.
    pub arguments: &'static str,
    pub description: &'static str,
    /// Fields the user must have supplied before a write may be emitted.
    pub required_fields: &'static [&'static str],
}

impl OperationSpec {
    const fn query(name: &'static str, arguments: &'static str, description: &'static str) -> Self {
        Self {
            kind: OperationKind::Query,
            name,
            arguments,
            description,
            required_fields: &[],
        }
    }

    const fn mutation(
        name: &'static str,
        arguments: &'static str,
        description: &'static str,
        required_fields: &'static [&'static str],
    ) -> Self {
        Self {
            kind: OperationKind::Mutation,
            name,
            arguments,
            description,
            required_fields,
        }
    }

    /// `name(args)` or bare `name` when the operation takes no arguments.
    pub fn signature(&self) -> String {
        if self.arguments.is_empty() {
            self.name.to_string()
        } else {
            format!("{}({})", self.name, self.arguments)
        }
    }
}

/// A worked request → output pair shown to the backend.
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub request: &'static str,
    pub output: &'static str,
}

/// Normalisation conventions the backend must apply when extracting values.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRules {
    pub version: &'static str,
    pub rules: &'static [&'static str],
}

/// The immutable, process-wide schema descriptor.
#[derive(Debug)]
pub struct SchemaDescriptor {
    pub version: &'static str,
    pub system_name: &'static str,
    pub entities: &'static [EntityType],
    pub operations: &'static [OperationSpec],
    pub extraction_rules: ExtractionRules,
    pub examples: &'static [Example],
}

static BUILTIN: SchemaDescriptor = SchemaDescriptor {
    version: SCHEMA_VERSION,
    system_name: "CLP Alumni Directory",
    entities: ENTITIES,
    operations: OPERATIONS,
    extraction_rules: EXTRACTION_RULES,
    examples: EXAMPLES,
};

static CONTEXT_TEXT: OnceLock<String> = OnceLock::new();

impl SchemaDescriptor {
    /// The descriptor shipped with this build.
    pub fn builtin() -> &'static SchemaDescriptor {
        &BUILTIN
    }

    /// The complete prompt preamble for the builtin descriptor, rendered once.
    pub fn context_text() -> &'static str {
        CONTEXT_TEXT.get_or_init(|| BUILTIN.render())
    }

    pub fn operation(&self, name: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn entity(&self, name: &str) -> Option<&EntityType> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn queries(&self) -> impl Iterator<Item = &OperationSpec> {
        self.operations
            .iter()
            .filter(|op| op.kind == OperationKind::Query)
    }

    pub fn mutations(&self) -> impl Iterator<Item = &OperationSpec> {
        self.operations
            .iter()
            .filter(|op| op.kind == OperationKind::Mutation)
    }

    /// Render the full descriptor as prompt text.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(8 * 1024);

        let _ = writeln!(
            out,
            "You are an expert GraphQL query generator for the {} system.",
            self.system_name
        );
        let _ = writeln!(out, "Schema version: {}", self.version);

        out.push_str("\nAvailable Types:\n");
        for (i, entity) in self.entities.iter().enumerate() {
            let _ = writeln!(out, "{}. {}: {}", i + 1, entity.name, entity.fields.join(", "));
        }

        out.push_str("\nAvailable Queries:\n");
        for op in self.queries() {
            let _ = writeln!(out, "- {}: {}", op.signature(), op.description);
        }

        out.push_str("\nAvailable Mutations:\n");
        for op in self.mutations() {
            let _ = writeln!(out, "- {}: {}", op.signature(), op.description);
        }

        let _ = writeln!(
            out,
            "\nEXTRACTION RULES (v{}):",
            self.extraction_rules.version
        );
        for (i, rule) in self.extraction_rules.rules.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, rule);
        }

        out.push_str("\nREQUIRED FIELDS (ask for any that the user has not given):\n");
        for op in self.mutations().filter(|op| !op.required_fields.is_empty()) {
            let _ = writeln!(out, "- {}: {}", op.name, op.required_fields.join(", "));
        }
        let _ = writeln!(
            out,
            "If a required field is missing, respond with exactly one line:\n\
             {}: Please provide <comma-separated missing fields>",
            querywright_core::NEED_INFO_MARKER
        );

        out.push_str(
            "\nIMPORTANT RULES:\n\
             1. Return ONLY the GraphQL operation (or the NEED_INFO line), no explanations\n\
             2. Use proper GraphQL syntax and close every brace\n\
             3. For searches, use the most specific query (getAlumniByEmployer for companies, getEventsByDate for dates, etc.)\n\
             4. Always request relevant fields in the response\n\
             5. Use proper input types for mutations\n",
        );

        out.push_str("\nEXAMPLES:\n");
        for example in self.examples {
            let _ = writeln!(out, "User: {}\nOutput: {}\n", example.request, example.output);
        }

        out
    }
}

const ENTITIES: &[EntityType] = &[
    EntityType {
        name: "Alumni",
        fields: &[
            "_id",
            "Alumni_id",
            "Name",
            "Email",
            "Graduation_year",
            "Field_of_study[]",
            "Employer",
            "Employment_title",
            "Employer_location{City, State}",
            "Employment_status",
            "Phone",
            "Address",
        ],
    },
    EntityType {
        name: "Event",
        fields: &[
            "_id",
            "Event_id",
            "Name",
            "Description",
            "Location",
            "Date",
            "Time",
            "Capacity",
            "Organizer_id",
        ],
    },
    EntityType {
        name: "Reservation",
        fields: &[
            "_id",
            "Reservation_id",
            "Alumni_id",
            "Event_id",
            "Number_of_attendees",
            "Payment_amount",
            "Payment_status",
        ],
    },
    EntityType {
        name: "Photo",
        fields: &[
            "_id",
            "Photo_id",
            "File_id",
            "File_name",
            "Alumni_id",
            "Uploader_name",
            "Event_id",
            "Tags[]",
        ],
    },
    EntityType {
        name: "Admin",
        fields: &["_id", "Admin_id", "Username", "Role", "Email"],
    },
];

const OPERATIONS: &[OperationSpec] = &[
    // Alumni
    OperationSpec::query("getAlumni", "", "Get all alumni"),
    OperationSpec::query("getAlumniById", "id: ID!", "Get alumni by MongoDB _id"),
    OperationSpec::query("getAlumniByAlumniId", "Alumni_id: String!", "Get alumni by Alumni_id"),
    OperationSpec::query("getAlumniByEmail", "Email: String!", "Get alumni by email"),
    OperationSpec::query("getAlumniByEmployer", "Employer: String!", "Get alumni by employer name"),
    // Events
    OperationSpec::query("getEvents", "", "Get all events"),
    OperationSpec::query("getEventById", "id: ID!", "Get event by MongoDB _id"),
    OperationSpec::query("getEventByEventId", "Event_id: String!", "Get event by Event_id"),
    OperationSpec::query("getEventsByDate", "Date: String!", "Get events by date"),
    // Reservations
    OperationSpec::query("getReservations", "", "Get all reservations"),
    OperationSpec::query("getReservationById", "id: ID!", "Get reservation by MongoDB _id"),
    OperationSpec::query("getReservationsByAlumni", "Alumni_id: String!", "Get reservations by alumni"),
    OperationSpec::query("getReservationsByEvent", "Event_id: String!", "Get reservations by event"),
    // Photos
    OperationSpec::query("getPhotos", "", "Get all photos"),
    OperationSpec::query("getPhotoById", "id: ID!", "Get photo by MongoDB _id"),
    OperationSpec::query("getPhotosByEvent", "Event_id: String!", "Get photos by event"),
    OperationSpec::query("getPhotosByAlumni", "Alumni_id: String!", "Get photos uploaded by an alumni"),
    OperationSpec::query("getPhotosByTags", "Tags: [String!]!", "Get photos by tags"),
    // Admins
    OperationSpec::query("getAdmins", "", "Get all admins"),
    OperationSpec::query("getAdminById", "id: ID!", "Get admin by MongoDB _id"),
    // Alumni writes
    OperationSpec::mutation(
        "createAlumni",
        "input: AlumniInput!",
        "Create new alumni",
        &["Name", "Email", "Graduation_year", "Password"],
    ),
    OperationSpec::mutation("updateAlumni", "id: ID!, input: AlumniUpdateInput!", "Update alumni", &["id"]),
    OperationSpec::mutation("deleteAlumni", "id: ID!", "Delete alumni", &["id"]),
    // Event writes
    OperationSpec::mutation(
        "createEvent",
        "input: EventInput!",
        "Create new event (Organizer_id is CURRENT_USER)",
        &["Name", "Date", "Time", "Location"],
    ),
    OperationSpec::mutation("updateEvent", "id: ID!, input: EventUpdateInput!", "Update event", &["id"]),
    OperationSpec::mutation("deleteEvent", "id: ID!", "Delete event", &["id"]),
    // Reservation writes
    OperationSpec::mutation(
        "createReservation",
        "input: ReservationInput!",
        "Create new reservation (Alumni_id is CURRENT_USER)",
        &["Event_id", "Number_of_attendees"],
    ),
    OperationSpec::mutation(
        "updateReservation",
        "id: ID!, input: ReservationUpdateInput!",
        "Update reservation",
        &["id"],
    ),
    OperationSpec::mutation("deleteReservation", "id: ID!", "Delete reservation", &["id"]),
    // Photo writes
    OperationSpec::mutation(
        "createPhoto",
        "input: PhotoInput!",
        "Create new photo record (Alumni_id is CURRENT_USER)",
        &["File_id", "File_name"],
    ),
    OperationSpec::mutation("updatePhoto", "id: ID!, input: PhotoUpdateInput!", "Update photo", &["id"]),
    OperationSpec::mutation("deletePhoto", "id: ID!", "Delete photo", &["id"]),
    // Admin writes
    OperationSpec::mutation("createAdmin", "input: AdminInput!", "Create new admin", &["Username", "Password"]),
    OperationSpec::mutation("updateAdmin", "id: ID!, input: AdminUpdateInput!", "Update admin", &["id"]),
    OperationSpec::mutation("deleteAdmin", "id: ID!", "Delete admin", &["id"]),
    // Authentication
    OperationSpec::mutation(
        "loginAlumni",
        "Email: String!, Password: String!",
        "Alumni login",
        &["Email", "Password"],
    ),
    OperationSpec::mutation(
        "loginAdmin",
        "Username: String!, Password: String!",
        "Admin login",
        &["Username", "Password"],
    ),
    OperationSpec::mutation(
        "registerAlumni",
        "input: AlumniInput!",
        "Register a new alumni account",
        &["Name", "Email", "Graduation_year", "Password"],
    ),
];

const EXTRACTION_RULES: ExtractionRules = ExtractionRules {
    version: "3",
    rules: &[
        "Dates: convert any date expression (\"March 5th\", \"5/3/2025\", \"next Friday\") to YYYY-MM-DD",
        "Times: convert to 24-hour HH:MM (\"6pm\" -> \"18:00\", \"noon\" -> \"12:00\")",
        "Locations: write as \"City, ST\" with the two-letter US state code (\"Austin, Texas\" -> \"Austin, TX\")",
        "Organizer_id and Alumni_id of the requesting user are always \"CURRENT_USER\"; never ask for them",
        "Event names: use Title Case; derive a short name from the description when none is given",
        "Numbers: write counts and amounts as bare numbers (\"two people\" -> 2)",
        "Combine details spread across earlier messages with the latest request before deciding what is missing",
    ],
};

const EXAMPLES: &[Example] = &[
    Example {
        request: "Find all alumni working at Google",
        output: r#"query { getAlumniByEmployer(Employer: "Google") { Alumni_id Name Email Employment_title } }"#,
    },
    Example {
        request: "Show me events on March 15th 2025",
        output: r#"query { getEventsByDate(Date: "2025-03-15") { Event_id Name Location Date Time } }"#,
    },
    Example {
        request: "Get all photos from event E1001",
        output: r#"query { getPhotosByEvent(Event_id: "E1001") { Photo_id File_name Tags } }"#,
    },
    Example {
        request: "Show me all reservations for event E1002",
        output: r#"query { getReservationsByEvent(Event_id: "E1002") { Reservation_id Alumni_id Number_of_attendees Payment_status } }"#,
    },
    Example {
        request: "Create a networking mixer on June 5 2025 at 6pm in Austin, Texas",
        output: r#"mutation { createEvent(input: { Name: "Networking Mixer", Date: "2025-06-05", Time: "18:00", Location: "Austin, TX", Organizer_id: "CURRENT_USER" }) { Event_id Name Date Time Location } }"#,
    },
    Example {
        request: "Create an event called Alumni Brunch",
        output: "NEED_INFO: Please provide Date, Time, Location",
    },
    Example {
        request: "Reserve 2 spots for event E1002",
        output: r#"mutation { createReservation(input: { Alumni_id: "CURRENT_USER", Event_id: "E1002", Number_of_attendees: 2 }) { Reservation_id Event_id Number_of_attendees Payment_status } }"#,
    },
];
