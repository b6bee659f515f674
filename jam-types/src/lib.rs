mod default;

// JAM protocol types
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use constants::node::{ENTROPY_POOL_SIZE, GUARANTEE_CREDENTIALS};
use thiserror::Error;

// ----------------------------------------------------------------------------------------------------------
// Crypto
// ----------------------------------------------------------------------------------------------------------
pub type Ed25519Public = [u8; 32];
pub type BlsPublic = [u8; 144];
pub type BandersnatchPublic = [u8; 32];

pub type BandersnatchVrfSignature = [u8; 96];
pub type Ed25519Signature = [u8; 64];

pub type BandersnatchRingRoot = [u8; 384];

// ----------------------------------------------------------------------------------------------------------
// Application specific core
// ----------------------------------------------------------------------------------------------------------
pub type OpaqueHash = [u8; 32];
pub type Metadata = [u8; 128];

pub type TimeSlot = u32;
pub type ValidatorIndex = u32;
pub type CoreIndex = u32;
pub type ServiceId = u32;

pub type Hash = OpaqueHash;
pub type HeaderHash = OpaqueHash;
pub type StateRoot = OpaqueHash;
pub type WorkPackageHash = OpaqueHash;
pub type WorkReportHash = OpaqueHash;
pub type AuthorizerHash = OpaqueHash;

pub type Gas = i64;
pub type Balance = u64;

// ----------------------------------------------------------------------------------------------------------
// Block
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub header: Header,
    pub extrinsic: Extrinsic,
}

/// The seal commits to the serialization of the header without itself, so
/// the unsealed part is its own type. Parent references hash the unsealed
/// form; storage and transport carry the sealed form.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub unsigned: UnsignedHeader,
    pub seal: BandersnatchVrfSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedHeader {
    pub parent: HeaderHash,
    pub state_root: StateRoot,
    pub extrinsic_hash: OpaqueHash,
    pub slot: TimeSlot,
    pub epoch_mark: Option<EpochMark>,
    pub tickets_mark: Option<TicketsMark>,
    pub judgements_mark: Vec<WorkReportHash>,
    pub author_index: ValidatorIndex,
    pub entropy_source: BandersnatchVrfSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extrinsic {
    // Tickets, used for the mechanism which manages the selection of validators for the permissioning of block authoring
    pub tickets: Vec<Ticket>,
    // Votes, by validators, on the validity of previously guaranteed work reports
    pub judgements: Vec<Judgement>,
    // Static data which is presently being requested to be available for workloads to fetch on demand
    pub preimages: Vec<Preimage>,
    // Assurances by each validator concerning which work-report data they have correctly received and are storing locally
    pub assurances: Vec<Assurance>,
    // Reports of newly completed workloads whose accuracy is guaranteed by specific validators
    pub guarantees: Vec<Guarantee>,
}

// The epoch marker is either empty or, if the block is the first in a new epoch, a tuple of the epoch
// randomness and the sequence of Bandersnatch keys defining the validator set beginning in that epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochMark {
    pub epoch_randomness: OpaqueHash,
    pub validators: Vec<BandersnatchPublic>,
}

// The winning-tickets marker: the sealing ticket sequence for the epoch being entered.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketsMark {
    pub tickets: Vec<Ticket>,
}

// ----------------------------------------------------------------------------------------------------------
// Validators
// ----------------------------------------------------------------------------------------------------------

/// A combination of cryptographic public keys and an opaque metadata blob used
/// to carry practical identifiers for the validator. 336 octets in total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorKey {
    pub bandersnatch: BandersnatchPublic,
    pub ed25519: Ed25519Public,
    pub bls: BlsPublic,
    pub metadata: Metadata,
}

pub type ValidatorKeys = Vec<ValidatorKey>;

// ----------------------------------------------------------------------------------------------------------
// Tickets
// ----------------------------------------------------------------------------------------------------------

// A ticket is an entry in the epochal contest which decides the block-sealing
// key sequence of the following epoch. On the wire a ticket carries an entry
// index and a Ring-VRF proof; inside the accumulator the proof field holds the
// verified 32-octet VRF output, which doubles as the contest score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub entry_index: u32,
    pub proof: Vec<u8>,
}

// ----------------------------------------------------------------------------------------------------------
// Safrole
// ----------------------------------------------------------------------------------------------------------

/// The gamma component of global state: the keys pending activation, the
/// Bandersnatch ring root of the next epoch, the sealing ticket series of the
/// current epoch and the accumulator of the running contest.
#[derive(Debug, Clone, PartialEq)]
pub struct Safrole {
    pub pending_validators: ValidatorKeys,
    pub epoch_root: OpaqueHash,
    pub slot_sealers: Vec<Ticket>,
    pub ticket_accumulator: Vec<Ticket>,
}

// Standalone Safrole state machine shape used by the conformance vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct SafroleState {
    pub timeslot: TimeSlot,
    pub entropy: [OpaqueHash; ENTROPY_POOL_SIZE],
    pub prev_validators: ValidatorKeys,
    pub curr_validators: ValidatorKeys,
    pub next_validators: ValidatorKeys,
    pub designed_validators: ValidatorKeys,
    pub tickets_accumulator: Vec<Ticket>,
    pub tickets_or_keys: TicketsOrKeys,
    pub tickets_verifier_key: BandersnatchRingRoot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketsOrKeys {
    pub keys: Vec<BandersnatchPublic>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SafroleInput {
    pub slot: TimeSlot,
    pub entropy: OpaqueHash,
    pub extrinsics: Vec<Ticket>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SafroleOutput {
    pub epoch_mark: Option<EpochMark>,
    pub tickets_mark: Option<TicketsMark>,
}

// ----------------------------------------------------------------------------------------------------------
// Entropy
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyPool {
    pub buf: [OpaqueHash; ENTROPY_POOL_SIZE],
}

// ----------------------------------------------------------------------------------------------------------
// Work reports
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct WorkReport {
    // Hash of the authorizer under which this report was produced
    pub authorizer_hash: AuthorizerHash,
    // Authorization output blob
    pub output: Vec<u8>,
    // Context of the chain at the point the report's work package was evaluated
    pub context: RefineContext,
    // Work package availability specification
    pub package_spec: AvailabilitySpec,
    // One result per work item in the package
    pub results: Vec<WorkResult>,
}

// A refinement context describes the chain state anchoring a work package.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineContext {
    pub anchor: OpaqueHash,
    pub state_root: OpaqueHash,
    pub beefy_root: OpaqueHash,
    pub lookup_anchor: OpaqueHash,
    pub lookup_anchor_slot: TimeSlot,
    pub prerequisite: Option<WorkPackageHash>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilitySpec {
    pub hash: WorkPackageHash,
    pub length: u32,
    pub erasure_root: OpaqueHash,
    pub exports_root: OpaqueHash,
}

// The work result is the data conduit by which service states may be altered
// through computation done within a work package.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkResult {
    pub service: ServiceId,
    pub code_hash: OpaqueHash,
    pub payload_hash: OpaqueHash,
    pub gas: Gas,
    pub result: WorkExecResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkExecResult {
    Ok(Vec<u8>),
    Error(WorkExecError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkExecError {
    OutOfGas = 1,
    Panic = 2,
    BadExports = 3,
    BadCode = 4,
}

impl WorkExecError {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(WorkExecError::OutOfGas),
            2 => Some(WorkExecError::Panic),
            3 => Some(WorkExecError::BadExports),
            4 => Some(WorkExecError::BadCode),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------------------------------------
// Availability assignments
// ----------------------------------------------------------------------------------------------------------

/// A guaranteed report parked on a core while it awaits availability.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub report: WorkReport,
    // Ed25519 keys of the validators whose attestations installed the report
    pub guarantors: Vec<Ed25519Public>,
    pub timestamp: TimeSlot,
}

pub type AvailabilityAssignments = Vec<Option<Assignment>>;

// ----------------------------------------------------------------------------------------------------------
// Authorizations
// ----------------------------------------------------------------------------------------------------------
pub type AuthPool = Vec<AuthorizerHash>;
pub type AuthPools = Vec<AuthPool>;

pub type AuthQueue = VecDeque<AuthorizerHash>;
pub type AuthQueues = Vec<AuthQueue>;

// ----------------------------------------------------------------------------------------------------------
// Block history
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInfo {
    // Block's header hash (sealed form)
    pub header_hash: HeaderHash,
    // Accumulation-result commitment for the block
    pub accumulate_root: OpaqueHash,
    // Block's state root
    pub state_root: StateRoot,
    // Hashes of the work reports accumulated in the block
    pub reported: Vec<WorkReportHash>,
}

/// Recent-history window, newest block first. Bounded by
/// `Config::history_window`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockHistory {
    pub blocks: VecDeque<BlockInfo>,
}

// ----------------------------------------------------------------------------------------------------------
// Judgements
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Judgement {
    pub target: WorkReportHash,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    pub valid: bool,
    pub index: ValidatorIndex,
    pub signature: Vec<u8>,
}

/// The psi component: reports judged valid, reports judged invalid, and the
/// keys of validators punished for guaranteeing invalid reports. The allow and
/// ban sets are kept disjoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JudgementRecords {
    pub allow: BTreeSet<WorkReportHash>,
    pub ban: BTreeSet<WorkReportHash>,
    pub punish: BTreeSet<Ed25519Public>,
}

// ----------------------------------------------------------------------------------------------------------
// Preimages
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Preimage {
    pub requester: ServiceId,
    pub blob: Vec<u8>,
}

// ----------------------------------------------------------------------------------------------------------
// Assurances
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Assurance {
    // Hash binding the assurance to the report it vouches for
    pub anchor: OpaqueHash,
    // One flag per core; true marks the core whose data the validator holds
    pub flags: Vec<bool>,
    pub validator_index: ValidatorIndex,
    pub signature: Vec<u8>,
}

// ----------------------------------------------------------------------------------------------------------
// Guarantees
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct Attestation {
    pub validator_index: ValidatorIndex,
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guarantee {
    pub core_index: CoreIndex,
    pub report: WorkReport,
    pub slot: TimeSlot,
    pub attestations: [Option<Attestation>; GUARANTEE_CREDENTIALS],
}

// ----------------------------------------------------------------------------------------------------------
// Service accounts
// ----------------------------------------------------------------------------------------------------------

pub type ServiceAccounts = BTreeMap<ServiceId, ServiceAccount>;

/// Composite key of the preimage availability record: the preimage hash
/// followed by the preimage length. The derived ordering (hash first, length
/// second) is the canonical encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreimageKey {
    pub hash: OpaqueHash,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceAccount {
    // Storage dictionary
    pub storage: BTreeMap<OpaqueHash, Vec<u8>>,
    // Preimage lookup dictionary
    pub preimages: BTreeMap<OpaqueHash, Vec<u8>>,
    // Preimage availability records, append-only per key
    pub lookup: BTreeMap<PreimageKey, Vec<TimeSlot>>,
    // Code hash
    pub code_hash: OpaqueHash,
    // Account balance
    pub balance: Balance,
    // Gas bound for one invocation of the accumulate entry point
    pub acc_gas_limit: Gas,
    // Gas bound for one invocation of the on-transfer entry point
    pub xfer_gas_limit: Gas,
    // Service code; resolved through the preimage store, never serialized
    pub code: Vec<u8>,
}

// ----------------------------------------------------------------------------------------------------------
// Privileges
// ----------------------------------------------------------------------------------------------------------

// The chi component: three service indices with distinguished powers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Privileges {
    pub manager: ServiceId,
    pub authorizer: ServiceId,
    pub validator: ServiceId,
}

// ----------------------------------------------------------------------------------------------------------
// Statistics
// ----------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActivityRecord {
    pub blocks: u32,
    pub tickets: u32,
    pub preimages: u32,
    pub preimages_size: u32,
    pub guarantees: u32,
    pub assurances: u32,
}

/// Per-validator activity counters: one accumulator for the running epoch and
/// one completed record for the previous epoch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    pub curr: Vec<ActivityRecord>,
    pub prev: Vec<ActivityRecord>,
}

// ----------------------------------------------------------------------------------------------------------
// Global state
// ----------------------------------------------------------------------------------------------------------

/// The whole of global state. Fields are declared in the canonical
/// serialization order: alpha, beta, gamma, delta, eta, iota, kappa, lambda,
/// rho, tau, phi, chi, psi, pi.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalState {
    // alpha: per-core authorizer pools
    pub auth_pools: AuthPools,
    // beta: recent-history window
    pub recent_history: BlockHistory,
    // gamma: Safrole consensus state
    pub safrole: Safrole,
    // delta: service accounts
    pub service_accounts: ServiceAccounts,
    // eta: entropy pool
    pub entropy: EntropyPool,
    // iota: prospective validator keys
    pub next_validators: ValidatorKeys,
    // kappa: active validator keys
    pub curr_validators: ValidatorKeys,
    // lambda: archived validator keys
    pub prev_validators: ValidatorKeys,
    // rho: per-core work-report slots
    pub availability: AvailabilityAssignments,
    // tau: most recent block's timeslot
    pub time: TimeSlot,
    // phi: per-core authorizer queues
    pub auth_queues: AuthQueues,
    // chi: privileged service indices
    pub privileges: Privileges,
    // psi: judgement sets
    pub judgements: JudgementRecords,
    // pi: validator statistics
    pub statistics: Statistics,
}

// ----------------------------------------------------------------------------------------------------------
// Errors
// ----------------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ReadError {
    #[error("not enough data to decode")]
    InsufficientData,
    #[error("invalid data encountered during decoding")]
    InvalidEncoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HeaderError {
    #[error("block slot is ahead of the current time")]
    FutureSlot,
    #[error("block slot does not advance the chain")]
    BadSlot,
    #[error("parent hash does not match the parent header")]
    BadParentHash,
    #[error("epoch mark validator count does not match the configuration")]
    BadEpochMark,
    #[error("winning tickets count does not match the epoch length")]
    BadTicketsMark,
    #[error("author index is out of range")]
    BadAuthorIndex,
    #[error("extrinsic hash does not commit to the block's extrinsic")]
    BadExtrinsicHash,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error("service {0} not found")]
    ServiceNotFound(ServiceId),
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("core index {0} out of range")]
    CoreIndexOutOfRange(CoreIndex),
    #[error("virtual machine memory fault")]
    PvmFault,
    #[error("virtual machine ran out of gas")]
    PvmOutOfGas,
    #[error("virtual machine panicked")]
    PvmPanic,
    #[error("accumulate invocation failed for service {0}")]
    AccumulateFailed(ServiceId),
}
