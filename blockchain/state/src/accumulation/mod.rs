/*
    Accumulation folds available work reports into service state by invoking
    each result's service through the virtual-machine facade. One accumulate
    invocation is the transactional unit: the pre-call state is retained and
    the returned state replaces it only on a clean halt. A failed result is
    rolled back and logged; later results in the same block still run.
*/

use jam_types::{
    CoreIndex, GlobalState, ProcessError, ServiceAccount, ServiceId, WorkReport, WorkResult,
};

use codec::Encode;
use pvm::ExitReason;

pub const ENTRY_REFINE: u32 = 0;
pub const ENTRY_ACCUMULATE: u32 = 1;
pub const ENTRY_ON_TRANSFER: u32 = 2;

/// Accumulate every result of the given reports, in report order. Reports
/// arrive paired with the core they were promoted from.
pub fn process(reports: &[(CoreIndex, WorkReport)], mut state: GlobalState) -> GlobalState {
    for (core, report) in reports {
        log::debug!(
            "accumulating report {} from core {} with {} results",
            utils::print_hash!(report.authorizer_hash),
            core,
            report.results.len()
        );
        for result in &report.results {
            state = accumulate_result(state, result);
        }
    }
    state
}

fn accumulate_result(state: GlobalState, result: &WorkResult) -> GlobalState {
    let Some(account) = state.service_accounts.get(&result.service) else {
        log::warn!(
            "accumulate: {}",
            ProcessError::ServiceNotFound(result.service)
        );
        return state;
    };

    let code = account.code.clone();
    let gas_limit = account.acc_gas_limit.max(0) as u64;
    let input = result.result.encode();

    // Retain the pre-call state; on failure it is the post state.
    let snapshot = state.clone();

    let (exit, _) = pvm::execute(&code, ENTRY_ACCUMULATE, &input, gas_limit);
    match exit {
        ExitReason::Halt => state,
        other => {
            log::warn!(
                "{}: {:?}",
                ProcessError::AccumulateFailed(result.service),
                other
            );
            snapshot
        }
    }
}

/// The stateless in-core entry point: run the service's refine logic over the
/// input and hand back its output.
pub fn refine(
    account: &ServiceAccount,
    input: &[u8],
    gas_limit: u64,
) -> Result<Vec<u8>, ProcessError> {
    let (exit, _) = pvm::execute(&account.code, ENTRY_REFINE, input, gas_limit);
    match exit {
        ExitReason::Halt => Ok(Vec::new()),
        other => Err(exit_error(other)),
    }
}

/// Move `amount` from one service to another and notify the receiver through
/// its on-transfer entry point. The whole operation is transactional: on any
/// failure the state is left exactly as it was.
pub fn on_transfer(
    state: &mut GlobalState,
    from: ServiceId,
    to: ServiceId,
    amount: u64,
    memo: &[u8],
) -> Result<(), ProcessError> {
    if !state.service_accounts.contains_key(&from) {
        return Err(ProcessError::ServiceNotFound(from));
    }
    let Some(receiver) = state.service_accounts.get(&to) else {
        return Err(ProcessError::ServiceNotFound(to));
    };

    let code = receiver.code.clone();
    let gas_limit = receiver.xfer_gas_limit.max(0) as u64;

    if state.service_accounts[&from].balance < amount {
        log::warn!("transfer of {} exceeds balance of service {}", amount, from);
        return Err(ProcessError::AccumulateFailed(from));
    }

    let snapshot = state.clone();

    state.service_accounts.get_mut(&from).unwrap().balance -= amount;
    state.service_accounts.get_mut(&to).unwrap().balance += amount;

    let mut input = Vec::new();
    from.encode_to(&mut input);
    to.encode_to(&mut input);
    amount.encode_to(&mut input);
    input.extend_from_slice(memo);

    let (exit, _) = pvm::execute(&code, ENTRY_ON_TRANSFER, &input, gas_limit);
    match exit {
        ExitReason::Halt => Ok(()),
        other => {
            *state = snapshot;
            let error = exit_error(other);
            log::warn!("on-transfer to service {} failed: {}", to, error);
            Err(error)
        }
    }
}

fn exit_error(exit: ExitReason) -> ProcessError {
    match exit {
        ExitReason::OutOfGas => ProcessError::PvmOutOfGas,
        ExitReason::Fault => ProcessError::PvmFault,
        _ => ProcessError::PvmPanic,
    }
}
