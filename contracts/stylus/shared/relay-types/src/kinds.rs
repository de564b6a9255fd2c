/// Operation kinds an `Authorization` may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperationKind {
    /// External token moved `from` -> `to`.
    Transfer = 0,
    /// External token pulled into custody, credited to `to`.
    Deposit = 1,
    /// Internal balance moved `from` -> `to`.
    Process = 2,
    /// Internal balance debited, external token sent to `to`.
    Claim = 3,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Transfer,
        OperationKind::Deposit,
        OperationKind::Process,
        OperationKind::Claim,
    ];
}

impl TryFrom<u8> for OperationKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use OperationKind::*;
        let kind = match value {
            0 => Transfer,
            1 => Deposit,
            2 => Process,
            3 => Claim,
            _ => return Err(()),
        };
        Ok(kind)
    }
}

/// Opcodes understood by the leverage hook (first byte of the hook data).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LeverageOpcode {
    IncreaseLeverage = 0,
    DecreaseLeverage = 1,
    CloseToLoan = 2,
    CloseToCollateral = 3,
}

impl TryFrom<u8> for LeverageOpcode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use LeverageOpcode::*;
        let op = match value {
            0 => IncreaseLeverage,
            1 => DecreaseLeverage,
            2 => CloseToLoan,
            3 => CloseToCollateral,
            _ => return Err(()),
        };
        Ok(op)
    }
}
