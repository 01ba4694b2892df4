//! Column table of the `CEDE_INTERFACE` target table.
//!
//! Entries are listed in INSERT order: the typed columns first, then the
//! text columns. Every column must be present in an input header; values may
//! be empty and are then inserted as NULL.

use crate::domain::schema::{FieldKind, FieldSpec};
use FieldKind::{Date, Decimal, Integer, Text, Timestamp};

pub const CEDE_INTERFACE_TABLE: &str = "CEDE_INTERFACE";

const fn column(name: &'static str, kind: FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
        description,
    }
}

pub const CEDE_INTERFACE_COLUMNS: &[FieldSpec] = &[
    column("IMPORT_TS", Timestamp, "Time the row was staged for import"),
    column("CREATION_TS", Timestamp, "Time the row was created in the source system"),
    column("RECORD_TYPE", Integer, "Kind of accounting record"),
    column("DTL_AMT", Decimal, "Detail amount"),
    column("AS_AT", Date, "Valuation date"),
    column("OCC_YR", Integer, "Occurrence year"),
    column("UW_YEAR", Integer, "Underwriting year"),
    column("AC_YEAR", Integer, "Accounting year"),
    column("AC_START_DATE", Date, "Start of the accounting period"),
    column("AC_END_DATE", Date, "End of the accounting period"),
    column("DATE_OF_BOOKING", Date, "Booking date"),
    column("BOOKING_YEAR", Integer, "Booking year"),
    column("BOOKING_YEAR_2", Integer, "Second booking year"),
    column("BOOKING_YEAR_3", Integer, "Third booking year"),
    column("CEDE", Integer, "Ceded flag"),
    column("IS_ESTIMATE", Integer, "Estimate flag"),
    column("IP_START", Date, "Inception of the insurance period"),
    column("IP_END", Date, "Expiry of the insurance period"),
    column("ORIGINAL_IP_START", Date, "Original inception date"),
    column("ORIGINAL_IP_END", Date, "Original expiry date"),
    column("AUTOMATIC_PROT_ASS", Integer, "Automatic protection assignment flag"),
    column("ATT_FROM", Date, "Attachment start"),
    column("ATT_TO", Date, "Attachment end"),
    column("MAIN_LIMIT", Decimal, "Main limit amount"),
    column("TOTAL_GROSS_P", Decimal, "Total gross premium"),
    column("SHARE_PCT", Decimal, "Share percentage"),
    column("DOL_BEGIN", Date, "Date of loss, first day"),
    column("DOL_END", Date, "Date of loss, last day"),
    column("INCL_IN_REC_ORDER", Integer, "Included in recovery order flag"),
    column("ACC_AS_OF_DATE", Date, "Accounting as-of date"),
    column("PC_LIMIT_INFO1", Decimal, "First limit amount"),
    column("PC_LIMIT_INFO2", Decimal, "Second limit amount"),
    column("PC_DECL_ATT_FROM", Date, "Declaration attachment start"),
    column("PC_DECL_ATT_TO", Date, "Declaration attachment end"),
    column("PC_DECL_MAIN_L", Decimal, "Declaration main limit"),
    column("PC_RUG_SEQUENT", Integer, "Risk unit group sequence"),
    column("LF_SAR", Decimal, "Sum at risk"),
    column("LF_XTRA_MORTAL_PCT", Decimal, "Extra mortality percentage"),
    column("LF_OTHER_XTRA_PREM", Decimal, "Other extra premium"),
    column("LF_AGE", Integer, "Insured age"),
    column("LF_RETIREMENT_AGE", Integer, "Retirement age"),
    column("LF_IAB_BEGIN_DATE", Date, "Individual agreement begin date"),
    column("LF_IO_DT_OF_BIRTH", Date, "Insured person date of birth"),
    column("CLAIM_ADVISED_DT", Date, "Date the claim was advised"),
    column("AUTO_LGT_CL_PT_ASS", Integer, "Automatic long-tail claim protection assignment flag"),
    column("UDF_PCT1", Decimal, "User-defined percentage 1"),
    column("UDF_PCT2", Decimal, "User-defined percentage 2"),
    column("UDF_PCT3", Decimal, "User-defined percentage 3"),
    column("UDF_PCT4", Decimal, "User-defined percentage 4"),
    column("FSK_UDF_REF_DATA", Integer, "User-defined reference data key"),
    column("UDF_AMT1_AMT", Decimal, "User-defined amount 1"),
    column("FK_UDF_AMT1_CY", Integer, "Currency of user-defined amount 1"),
    column("UDF_AMT2_AMT", Decimal, "User-defined amount 2"),
    column("FK_UDF_AMT2_CY", Integer, "Currency of user-defined amount 2"),
    column("UDF_AMT3_AMT", Decimal, "User-defined amount 3"),
    column("FK_UDF_AMT3_CY", Integer, "Currency of user-defined amount 3"),
    column("UDF_AMT4_AMT", Decimal, "User-defined amount 4"),
    column("FK_UDF_AMT4_CY", Integer, "Currency of user-defined amount 4"),
    column("UDF_AMT5_AMT", Decimal, "User-defined amount 5"),
    column("FK_UDF_AMT5_CY", Integer, "Currency of user-defined amount 5"),
    column("CLMS_TRIG_DT", Date, "Claims trigger date"),
    column("PC_NUM_OF_INSRD_OBJ", Integer, "Number of insured objects"),
    column("HL_DOL_BEGIN", Date, "Event loss, first day"),
    column("HL_DOL_END", Date, "Event loss, last day"),
    column("PC_RUG_PROP_GRP", Integer, "Risk unit group property group"),
    column("PC_RUG_AUTOMATIC_PROT_ASS", Integer, "Risk unit group automatic protection flag"),
    column("PC_RUG_TOP_LOCATION", Integer, "Risk unit group top location flag"),
    column("PC_ACCU_EXCL", Integer, "Accumulation exclusion flag"),
    column("PC_PA_INHERIT_EXCL", Integer, "Inherited exclusion flag"),
    column("VERSION", Integer, "Record version"),
    column("PID", Text, "Process identifier"),
    column("STATUS", Text, "Interface status"),
    column("BATCH_NAME", Text, "Source batch name"),
    column("RECORD_UNIQUE_ID", Text, "Unique record identifier"),
    column("PRIM_SYS", Text, "Primary source system"),
    column("ACCESS_CODE", Text, "Access code"),
    column("BASE_COMPANY", Text, "Base company"),
    column("EC", Text, "Entry code"),
    column("CURRENCY", Text, "Detail amount currency"),
    column("AC_REF_PERIOD", Text, "Accounting reference period"),
    column("BOOKING_PERIOD", Text, "Booking period"),
    column("BOOKING_PERIOD2", Text, "Second booking period"),
    column("BOOKING_PERIOD3", Text, "Third booking period"),
    column("DTL_COMMENT", Text, "Free-text comment"),
    column("WS_IDENTIFIER", Text, "Worksheet identifier"),
    column("WS_TITLE", Text, "Worksheet title"),
    column("UDF_TXT1", Text, "User-defined text 1"),
    column("UDF_TXT2", Text, "User-defined text 2"),
    column("UDF_TXT3", Text, "User-defined text 3"),
    column("POLICY_ID", Text, "Policy identifier"),
    column("POLICY_TITLE", Text, "Policy title"),
    column("POLICY_FORMER_ID", Text, "Former policy identifier"),
    column("REASON_FOR_MANPROT", Text, "Reason for manual protection"),
    column("SECTION_EXT_ID", Text, "External section identifier"),
    column("SECTION_NAME", Text, "Section name"),
    column("SEC_CURRENCY", Text, "Section currency"),
    column("MAIN_LIMIT_TYPE", Text, "Main limit type"),
    column("COUNTRY", Text, "Country"),
    column("COUNTRY_GRP", Text, "Country group"),
    column("STATE", Text, "State"),
    column("STATE_GRP", Text, "State group"),
    column("MCOB", Text, "Main class of business"),
    column("COB", Text, "Class of business"),
    column("SCOB", Text, "Sub-class of business"),
    column("ADDL_CLASS_1", Text, "Additional classification 1"),
    column("ADDL_CLASS_2", Text, "Additional classification 2"),
    column("ADDL_CLASS_3", Text, "Additional classification 3"),
    column("ADDL_CLASS_4", Text, "Additional classification 4"),
    column("ADDL_CLASS_5", Text, "Additional classification 5"),
    column("ADDL_CLASS_6", Text, "Additional classification 6"),
    column("ADDL_CLASS_7", Text, "Additional classification 7"),
    column("ADDL_CLASS_8", Text, "Additional classification 8"),
    column("ADDL_CLASS_9", Text, "Additional classification 9"),
    column("ADDL_CLASS_10", Text, "Additional classification 10"),
    column("ADDL_CLASS_11", Text, "Additional classification 11"),
    column("REP_UNIT_1", Text, "First reporting unit"),
    column("REP_UNIT_2", Text, "Second reporting unit"),
    column("REP_UNIT_3", Text, "Third reporting unit"),
    column("ORIGIN_OF_BUS", Text, "Origin of business"),
    column("PERIL", Text, "Peril"),
    column("CLAIM_ID", Text, "Claim identifier"),
    column("HL_LOSS_ID", Text, "Event loss identifier"),
    column("HL_LOSS_NAME", Text, "Event loss name"),
    column("CAUSE_OF_LOSS", Text, "Cause of loss"),
    column("CONSEQUENCE_OF_LOSS", Text, "Consequence of loss"),
    column("CLAIM_NAME", Text, "Claim name"),
    column("RISKNAME", Text, "Risk name"),
    column("CLAIM_UDF_TXT1", Text, "Claim user-defined text 1"),
    column("CLAIM_UDF_TXT2", Text, "Claim user-defined text 2"),
    column("CLAIM_UDF_TXT3", Text, "Claim user-defined text 3"),
    column("PC_LIMIT_INFO1_TYPE", Text, "First limit type"),
    column("PC_LIMIT_INFO2_TYPE", Text, "Second limit type"),
    column("PC_DECL_ID", Text, "Declaration identifier"),
    column("PC_DECL_NAME", Text, "Declaration name"),
    column("PC_DECL_CURR", Text, "Declaration currency"),
    column("PC_INSURED_ID", Text, "Insured identifier"),
    column("PC_INSURED_NAME", Text, "Insured name"),
    column("PC_RUG", Text, "Risk unit group"),
    column("PC_RUG_NAME", Text, "Risk unit group name"),
    column("PC_IO_ID", Text, "Insured object identifier"),
    column("PC_IO_NAME", Text, "Insured object name"),
    column("PC_IO_TYPE", Text, "Insured object type"),
    column("PC_CLAIM_BASIS", Text, "Claim basis"),
    column("LF_TRANS_TYPE", Text, "Life transaction type"),
    column("LF_CALC_BASIS", Text, "Life calculation basis"),
    column("LF_SMOKER_STATUS", Text, "Smoker status"),
    column("LF_OCCUPATION_CLS", Text, "Occupation class"),
    column("LF_RISK_CLASS", Text, "Risk class"),
    column("LF_DISABILITY_CLS", Text, "Disability class"),
    column("LF_ESCALATION", Text, "Escalation"),
    column("LF_IAB_IDENTIFIER", Text, "Individual agreement identifier"),
    column("LF_IO_PERSON_ID", Text, "Insured person identifier"),
    column("LF_IO_PERSON_NAME", Text, "Insured person name"),
    column("LF_IO_ALIAS", Text, "Insured person alias"),
    column("LF_IO_BIRTH_COUNTRY", Text, "Insured person country of birth"),
    column("LF_IO_NATIONALITY", Text, "Insured person nationality"),
    column("LF_IO_PERSON_STATUS", Text, "Insured person status"),
    column("LF_IO_GENDER", Text, "Insured person gender"),
    column("REASON_FOR_CHANGE", Text, "Reason for change"),
    column("REA_LGT_CL_MANPT", Text, "Reason for manual long-tail claim protection"),
    column("UDF_TXT4", Text, "User-defined text 4"),
    column("FRK_UDF_REF_DATA", Text, "User-defined reference data"),
    column("CLAIMS_TRIG", Text, "Claims trigger"),
    column("CLAIMANT", Text, "Claimant"),
    column("PC_ASSISTANCE_KEY", Text, "Assistance key"),
    column("CLAIM_STATUS", Text, "Claim status"),
    column("PC_RUG_REASON_FOR_MANPROT", Text, "Risk unit group reason for manual protection"),
    column("CLAIM_SHORT_DESC", Text, "Short claim description"),
    column("FK_ORDER", Text, "Order reference"),
    column("FK_LIGHT_DETAIL", Text, "Light detail reference"),
];
