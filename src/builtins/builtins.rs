use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::{
    ast::types::ExprType,
    errors::errors::{Error, ErrorImpl},
};

/// Lookup service describing operators, builtin functions and runtime fields.
///
/// `Unknown` in an argument position means any type is accepted there; in a
/// result position it means the type depends on an argument or a field.
pub trait OpSpec {
    /// Type of result `position` of `name`.
    fn op_type(&self, name: &str, position: usize) -> Result<ExprType, Error>;
    /// Expected type of argument `position` of `name`.
    fn arg_type(&self, name: &str, position: usize) -> Result<ExprType, Error>;
    fn runtime_field_type(&self, op: &str, field: &str) -> Result<ExprType, Error>;
    /// Returns whether `name` can be called like a function.
    fn is_builtin_fun(&self, name: &str) -> bool;
    /// Argument whose type is the result type of `name`, if any.
    fn dependent_arg(&self, name: &str) -> Option<usize>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpSignature {
    pub args: Vec<ExprType>,
    pub returns: Vec<ExprType>,
}

fn sig(args: &[ExprType], returns: &[ExprType]) -> OpSignature {
    OpSignature {
        args: args.to_vec(),
        returns: returns.to_vec(),
    }
}

fn fields(entries: &[(&'static str, ExprType)]) -> HashMap<&'static str, ExprType> {
    entries.iter().copied().collect()
}

const TXN_FIELDS: &[(&str, ExprType)] = &[
    ("Sender", ExprType::Bytes),
    ("Fee", ExprType::UInt64),
    ("FirstValid", ExprType::UInt64),
    ("LastValid", ExprType::UInt64),
    ("Note", ExprType::Bytes),
    ("Lease", ExprType::Bytes),
    ("Receiver", ExprType::Bytes),
    ("Amount", ExprType::UInt64),
    ("CloseRemainderTo", ExprType::Bytes),
    ("Type", ExprType::Bytes),
    ("TypeEnum", ExprType::UInt64),
    ("XferAsset", ExprType::UInt64),
    ("AssetAmount", ExprType::UInt64),
    ("AssetSender", ExprType::Bytes),
    ("AssetReceiver", ExprType::Bytes),
    ("AssetCloseTo", ExprType::Bytes),
    ("GroupIndex", ExprType::UInt64),
    ("TxID", ExprType::Bytes),
    ("ApplicationID", ExprType::UInt64),
    ("OnCompletion", ExprType::UInt64),
    ("NumAppArgs", ExprType::UInt64),
    ("NumAccounts", ExprType::UInt64),
    ("ApprovalProgram", ExprType::Bytes),
    ("ClearStateProgram", ExprType::Bytes),
    ("RekeyTo", ExprType::Bytes),
    ("ConfigAsset", ExprType::UInt64),
    ("ConfigAssetTotal", ExprType::UInt64),
    ("ConfigAssetDecimals", ExprType::UInt64),
    ("ConfigAssetUnitName", ExprType::Bytes),
    ("ConfigAssetName", ExprType::Bytes),
    ("ConfigAssetURL", ExprType::Bytes),
    ("ConfigAssetManager", ExprType::Bytes),
    ("ConfigAssetReserve", ExprType::Bytes),
    ("FreezeAsset", ExprType::UInt64),
    ("FreezeAssetAccount", ExprType::Bytes),
    ("FreezeAssetFrozen", ExprType::UInt64),
    ("CreatedAssetID", ExprType::UInt64),
    ("CreatedApplicationID", ExprType::UInt64),
];

const TXN_ARRAY_FIELDS: &[(&str, ExprType)] = &[
    ("ApplicationArgs", ExprType::Bytes),
    ("Accounts", ExprType::Bytes),
    ("Assets", ExprType::UInt64),
    ("Applications", ExprType::UInt64),
    ("Logs", ExprType::Bytes),
];

lazy_static! {
    static ref OP_SPECS: HashMap<&'static str, OpSignature> = {
        use ExprType::{Bytes as B, UInt64 as U, Unknown as A};

        let mut map = HashMap::new();
        for op in ["+", "-", "*", "/", "%", "&", "|", "^", "<", ">", "<=", ">=", "&&", "||"] {
            map.insert(op, sig(&[U, U], &[U]));
        }
        map.insert("==", sig(&[A, A], &[U]));
        map.insert("!=", sig(&[A, A], &[U]));
        for op in ["b+", "b-", "b*", "b/", "b%", "b&", "b|", "b^"] {
            map.insert(op, sig(&[B, B], &[B]));
        }
        for op in ["b==", "b!=", "b<", "b>", "b<=", "b>="] {
            map.insert(op, sig(&[B, B], &[U]));
        }
        map.insert("!", sig(&[U], &[U]));
        map.insert("~", sig(&[U], &[U]));
        map.insert("b~", sig(&[B], &[B]));

        map.insert("sqrt", sig(&[U], &[U]));
        map.insert("exp", sig(&[U, U], &[U]));
        map.insert("shl", sig(&[U, U], &[U]));
        map.insert("shr", sig(&[U, U], &[U]));
        map.insert("bitlen", sig(&[A], &[U]));
        map.insert("len", sig(&[B], &[U]));
        map.insert("itob", sig(&[U], &[B]));
        map.insert("btoi", sig(&[B], &[U]));
        map.insert("sha256", sig(&[B], &[B]));
        map.insert("keccak256", sig(&[B], &[B]));
        map.insert("sha512_256", sig(&[B], &[B]));
        map.insert("ed25519verify", sig(&[B, B, B], &[U]));
        map.insert("concat", sig(&[B, B], &[B]));
        map.insert("substring3", sig(&[B, U, U], &[B]));
        map.insert("extract3", sig(&[B, U, U], &[B]));
        map.insert("getbit", sig(&[A, U], &[U]));
        map.insert("setbit", sig(&[A, U, U], &[A]));
        map.insert("getbyte", sig(&[B, U], &[U]));
        map.insert("setbyte", sig(&[B, U, U], &[B]));
        map.insert("select", sig(&[A, A, U], &[A]));
        map.insert("balance", sig(&[A], &[U]));
        map.insert("min_balance", sig(&[A], &[U]));
        map.insert("log", sig(&[B], &[]));
        map.insert("assert", sig(&[U], &[]));

        map.insert("app_opted_in", sig(&[A, U], &[U]));
        map.insert("app_local_get", sig(&[A, B], &[A]));
        map.insert("app_local_get_ex", sig(&[A, U, B], &[A, U]));
        map.insert("app_global_get", sig(&[B], &[A]));
        map.insert("app_global_get_ex", sig(&[U, B], &[A, U]));
        map.insert("app_local_put", sig(&[A, B, A], &[]));
        map.insert("app_global_put", sig(&[B, A], &[]));
        map.insert("app_local_del", sig(&[A, B], &[]));
        map.insert("app_global_del", sig(&[B], &[]));
        map.insert("asset_holding_get", sig(&[A, U], &[A, U]));
        map.insert("asset_params_get", sig(&[U], &[A, U]));
        map.insert("app_params_get", sig(&[U], &[A, U]));
        map.insert("acct_params_get", sig(&[A], &[A, U]));

        map.insert("mulw", sig(&[U, U], &[U, U]));
        map.insert("addw", sig(&[U, U], &[U, U]));
        map.insert("expw", sig(&[U, U], &[U, U]));
        map.insert("divw", sig(&[U, U, U], &[U]));
        map.insert("divmodw", sig(&[U, U, U, U], &[U, U, U, U]));

        map.insert("arg", sig(&[], &[B]));
        map
    };

    static ref BUILTIN_FUNCTIONS: HashSet<&'static str> = OP_SPECS
        .keys()
        .copied()
        .filter(|name| name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .filter(|name| *name != "arg")
        .collect();

    static ref DEPENDENT_TYPES: HashMap<&'static str, usize> = {
        let mut map = HashMap::new();
        map.insert("setbit", 0);
        map.insert("select", 0);
        map
    };

    static ref RUNTIME_FIELDS: HashMap<&'static str, HashMap<&'static str, ExprType>> = {
        use ExprType::{Bytes as B, UInt64 as U};

        let txn = fields(TXN_FIELDS);
        let txn_array = fields(TXN_ARRAY_FIELDS);
        let mut txn_all = txn.clone();
        txn_all.extend(txn_array.iter());

        let mut map = HashMap::new();
        for op in ["txn", "gtxn", "gtxns", "itxn"] {
            map.insert(op, txn.clone());
        }
        for op in ["txna", "gtxna", "txnas", "gtxnas", "itxna"] {
            map.insert(op, txn_array.clone());
        }
        map.insert("itxn_field", txn_all);
        map.insert("global", fields(&[
            ("MinTxnFee", U),
            ("MinBalance", U),
            ("MaxTxnLife", U),
            ("ZeroAddress", B),
            ("GroupSize", U),
            ("LogicSigVersion", U),
            ("Round", U),
            ("LatestTimestamp", U),
            ("CurrentApplicationID", U),
            ("CreatorAddress", B),
            ("CurrentApplicationAddress", B),
            ("GroupID", B),
        ]));
        map.insert("asset_holding_get", fields(&[
            ("AssetBalance", U),
            ("AssetFrozen", U),
        ]));
        map.insert("asset_params_get", fields(&[
            ("AssetTotal", U),
            ("AssetDecimals", U),
            ("AssetDefaultFrozen", U),
            ("AssetUnitName", B),
            ("AssetName", B),
            ("AssetURL", B),
            ("AssetMetadataHash", B),
            ("AssetManager", B),
            ("AssetReserve", B),
            ("AssetFreeze", B),
            ("AssetClawback", B),
            ("AssetCreator", B),
        ]));
        map.insert("app_params_get", fields(&[
            ("AppApprovalProgram", B),
            ("AppClearStateProgram", B),
            ("AppGlobalNumUint", U),
            ("AppGlobalNumByteSlice", U),
            ("AppLocalNumUint", U),
            ("AppLocalNumByteSlice", U),
            ("AppExtraProgramPages", U),
            ("AppCreator", B),
            ("AppAddress", B),
        ]));
        map.insert("acct_params_get", fields(&[
            ("AcctBalance", U),
            ("AcctMinBalance", U),
            ("AcctAuthAddr", B),
        ]));
        map
    };
}

/// The builtin table of the default VM version.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOpSpec;

impl StaticOpSpec {
    fn signature(&self, name: &str) -> Result<&'static OpSignature, Error> {
        OP_SPECS.get(name).ok_or_else(|| {
            Error::unpositioned(ErrorImpl::UnknownOperation {
                op: name.to_string(),
            })
        })
    }
}

fn at(types: &[ExprType], name: &str, kind: &str, position: usize) -> Result<ExprType, Error> {
    types.get(position).copied().ok_or_else(|| {
        Error::unpositioned(ErrorImpl::InvalidPosition {
            op: name.to_string(),
            kind: kind.to_string(),
            position,
        })
    })
}

impl OpSpec for StaticOpSpec {
    fn op_type(&self, name: &str, position: usize) -> Result<ExprType, Error> {
        at(&self.signature(name)?.returns, name, "result", position)
    }

    fn arg_type(&self, name: &str, position: usize) -> Result<ExprType, Error> {
        at(&self.signature(name)?.args, name, "argument", position)
    }

    fn runtime_field_type(&self, op: &str, field: &str) -> Result<ExprType, Error> {
        RUNTIME_FIELDS
            .get(op)
            .and_then(|fields| fields.get(field))
            .copied()
            .ok_or_else(|| {
                Error::unpositioned(ErrorImpl::UnknownField {
                    op: op.to_string(),
                    field: field.to_string(),
                })
            })
    }

    fn is_builtin_fun(&self, name: &str) -> bool {
        BUILTIN_FUNCTIONS.contains(name)
    }

    fn dependent_arg(&self, name: &str) -> Option<usize> {
        DEPENDENT_TYPES.get(name).copied()
    }
}
